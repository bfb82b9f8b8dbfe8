//! Terminal implementation of the page screen.
//!
//! Fragments and texts go to stdout (or to files under `--out-dir`),
//! notices go to stdout or stderr by level, and confirmations are read from
//! stdin unless `--yes` was given. Visibility and navigation have no
//! terminal equivalent and are only logged.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use comanda_client::{Element, Notice, NoticeLevel, Route, Screen};

#[derive(Debug)]
pub struct TerminalScreen {
    assume_yes: bool,
    out_dir: Option<PathBuf>,
}

impl TerminalScreen {
    pub const fn new(assume_yes: bool, out_dir: Option<PathBuf>) -> Self {
        Self {
            assume_yes,
            out_dir,
        }
    }
}

impl Screen for TerminalScreen {
    fn render(&self, element: Element, html: String) {
        if let Some(dir) = &self.out_dir {
            let path = dir.join(format!("{}.html", element.id()));
            match fs::create_dir_all(dir).and_then(|()| fs::write(&path, html)) {
                Ok(()) => tracing::info!(path = %path.display(), "Fragment written"),
                Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to write fragment"),
            }
            return;
        }
        write_out(&format!("── {element} ──\n{}", html.trim()));
    }

    fn set_text(&self, element: Element, text: String) {
        write_out(&format!("{element}: {text}"));
    }

    fn set_visible(&self, element: Element, visible: bool) {
        tracing::debug!(%element, visible, "Visibility changed");
    }

    fn fill_form(&self, form: Element, values: Vec<(&'static str, String)>) {
        write_out(&format!("── {form} ──"));
        for (field, value) in values {
            write_out(&format!("  {field} = {value}"));
        }
    }

    fn reset_form(&self, form: Element) {
        tracing::debug!(%form, "Form reset");
    }

    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => write_err(&notice.decorated()),
            NoticeLevel::Success | NoticeLevel::Info => write_out(&notice.decorated()),
        }
    }

    fn flash(&self, element: Element, notice: Notice, duration: Duration) {
        tracing::debug!(%element, secs = duration.as_secs(), "Transient notice");
        self.notify(notice);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!(prompt = message, "Auto-confirmed");
            return true;
        }

        write_err(&format!("{message}\n[s/N] "));
        let mut answer = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut answer) {
            tracing::warn!(error = %e, "Failed to read confirmation");
            return false;
        }
        is_yes(&answer)
    }

    fn redirect(&self, route: Route, delay: Duration) {
        tracing::info!(%route, delay_secs = delay.as_secs(), "Page redirect requested");
    }
}

fn write_out(text: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{text}") {
        tracing::warn!(error = %e, "Failed to write to stdout");
    }
}

fn write_err(text: &str) {
    let mut stderr = io::stderr().lock();
    if let Err(e) = writeln!(stderr, "{text}") {
        tracing::warn!(error = %e, "Failed to write to stderr");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Sim "));
        assert!(is_yes("y"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("talvez"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let screen = TerminalScreen::new(true, None);
        assert!(screen.confirm("Deseja realmente sair?"));
    }

    #[test]
    fn test_render_writes_fragment_files() {
        let dir = std::env::temp_dir().join(format!("comanda-cli-test-{}", std::process::id()));
        let screen = TerminalScreen::new(false, Some(dir.clone()));

        screen.render(Element::OrdersList, "<div>Pedido #1</div>".to_string());

        let written = fs::read_to_string(dir.join("lista-pedidos.html")).unwrap();
        assert_eq!(written, "<div>Pedido #1</div>");
        fs::remove_dir_all(dir).unwrap();
    }
}
