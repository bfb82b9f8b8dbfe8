//! A [`Screen`] that records everything pages do to it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use comanda_client::{Element, Notice, NoticeLevel, Route, Screen};

/// One call a page made on the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Render(Element, String),
    Text(Element, String),
    Visible(Element, bool),
    FillForm(Element, Vec<(&'static str, String)>),
    ResetForm(Element),
    Notify(Notice),
    Flash(Element, Notice, Duration),
    Confirm(String),
    Redirect(Route, Duration),
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<ScreenEvent>,
    /// Answers for upcoming prompts, used in order.
    answers: VecDeque<bool>,
    default_answer: bool,
}

/// Records screen calls for assertions.
///
/// Prompts are accepted unless told otherwise. Cheap to clone; clones share
/// the recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingScreen {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingScreen {
    /// A screen that accepts every prompt.
    #[must_use]
    pub fn new() -> Self {
        let screen = Self::default();
        screen.lock().default_answer = true;
        screen
    }

    /// A screen that declines every prompt.
    #[must_use]
    pub fn declining() -> Self {
        Self::default()
    }

    /// Answer the next prompt with `answer`, then go back to the default.
    pub fn answer_next(&self, answer: bool) {
        self.lock().answers.push_back(answer);
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: ScreenEvent) {
        self.lock().events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> Vec<ScreenEvent> {
        self.lock().events.clone()
    }

    /// Forget what was recorded so far.
    pub fn clear(&self) {
        self.lock().events.clear();
    }

    /// Last markup rendered into `element`.
    #[must_use]
    pub fn rendered(&self, element: Element) -> Option<String> {
        self.lock().events.iter().rev().find_map(|event| match event {
            ScreenEvent::Render(target, html) if *target == element => Some(html.clone()),
            _ => None,
        })
    }

    /// Number of times `element` was rendered.
    #[must_use]
    pub fn render_count(&self, element: Element) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|event| matches!(event, ScreenEvent::Render(target, _) if *target == element))
            .count()
    }

    /// Last text set on `element`.
    #[must_use]
    pub fn text(&self, element: Element) -> Option<String> {
        self.lock().events.iter().rev().find_map(|event| match event {
            ScreenEvent::Text(target, text) if *target == element => Some(text.clone()),
            _ => None,
        })
    }

    /// Last visibility set on `element`.
    #[must_use]
    pub fn visible(&self, element: Element) -> Option<bool> {
        self.lock().events.iter().rev().find_map(|event| match event {
            ScreenEvent::Visible(target, visible) if *target == element => Some(*visible),
            _ => None,
        })
    }

    /// Every notice shown, blocking or flashed, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ScreenEvent::Notify(notice) | ScreenEvent::Flash(_, notice, _) => {
                    Some(notice.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Messages of the notices at `level`.
    #[must_use]
    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level == level)
            .map(|notice| notice.message)
            .collect()
    }

    /// Notices flashed into `element`, with their display time.
    #[must_use]
    pub fn flashes(&self, element: Element) -> Vec<(Notice, Duration)> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ScreenEvent::Flash(target, notice, duration) if *target == element => {
                    Some((notice.clone(), *duration))
                }
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn redirects(&self) -> Vec<(Route, Duration)> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ScreenEvent::Redirect(route, delay) => Some((*route, *delay)),
                _ => None,
            })
            .collect()
    }

    /// Prompts shown, in order.
    #[must_use]
    pub fn confirms(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ScreenEvent::Confirm(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Values last filled into `form`.
    #[must_use]
    pub fn form(&self, form: Element) -> Option<Vec<(&'static str, String)>> {
        self.lock().events.iter().rev().find_map(|event| match event {
            ScreenEvent::FillForm(target, values) if *target == form => Some(values.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn was_reset(&self, form: Element) -> bool {
        self.lock()
            .events
            .iter()
            .any(|event| matches!(event, ScreenEvent::ResetForm(target) if *target == form))
    }
}

impl Screen for RecordingScreen {
    fn render(&self, element: Element, html: String) {
        self.record(ScreenEvent::Render(element, html));
    }

    fn set_text(&self, element: Element, text: String) {
        self.record(ScreenEvent::Text(element, text));
    }

    fn set_visible(&self, element: Element, visible: bool) {
        self.record(ScreenEvent::Visible(element, visible));
    }

    fn fill_form(&self, form: Element, values: Vec<(&'static str, String)>) {
        self.record(ScreenEvent::FillForm(form, values));
    }

    fn reset_form(&self, form: Element) {
        self.record(ScreenEvent::ResetForm(form));
    }

    fn notify(&self, notice: Notice) {
        self.record(ScreenEvent::Notify(notice));
    }

    fn flash(&self, element: Element, notice: Notice, duration: Duration) {
        self.record(ScreenEvent::Flash(element, notice, duration));
    }

    fn confirm(&self, message: &str) -> bool {
        let mut recording = self.lock();
        recording
            .events
            .push(ScreenEvent::Confirm(message.to_string()));
        let default = recording.default_answer;
        recording.answers.pop_front().unwrap_or(default)
    }

    fn redirect(&self, route: Route, delay: Duration) {
        self.record(ScreenEvent::Redirect(route, delay));
    }
}
