//! The surface pages draw on.
//!
//! Page controllers never touch a concrete UI. They render markup into named
//! [`Element`]s, raise [`Notice`]s, ask for confirmation and request
//! navigation through the [`Screen`] trait. A browser shell, the terminal
//! front end and the test recorder each implement it.

use std::time::Duration;

/// Page the user can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public landing page with the menu and order placement.
    Landing,
    /// Staff login form.
    Login,
    /// Order dashboard.
    Orders,
}

impl Route {
    /// Path of the page on the web host.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Orders => "/pedidos",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Named region or control of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    // Order dashboard
    UserName,
    EmployeeRegistrationButton,
    ResetButton,
    OrdersList,
    ActiveCount,
    TotalOrders,
    PendingOrders,
    Revenue,
    HistoryList,
    HistoryCount,
    Statistics,
    // Landing page
    Lobby,
    MenuSection,
    OrderSection,
    Catalog,
    OrderProducts,
    CartItems,
    CartTotal,
    // Product pages
    ProductForm,
    ManageProducts,
    EditModal,
    EditForm,
    // Employee page
    EmployeeList,
    EmployeeForm,
    AlertContainer,
    // Login page
    LoginError,
}

impl Element {
    /// DOM id of the element in the page markup.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::UserName => "nome-usuario",
            Self::EmployeeRegistrationButton => "btn-cadastro-func",
            Self::ResetButton => "btn-resetar-ids",
            Self::OrdersList => "lista-pedidos",
            Self::ActiveCount => "count-ativos",
            Self::TotalOrders => "total-pedidos",
            Self::PendingOrders => "pedidos-pendentes",
            Self::Revenue => "receita-total",
            Self::HistoryList => "lista-historico",
            Self::HistoryCount => "count-historico",
            Self::Statistics => "estatisticas",
            Self::Lobby => "lobby",
            Self::MenuSection => "secao-cardapio",
            Self::OrderSection => "secao-pedido",
            Self::Catalog => "lista-cardapio",
            Self::OrderProducts => "lista-produtos-pedido",
            Self::CartItems => "itens-pedido",
            Self::CartTotal => "total",
            Self::ProductForm => "form-cadastro",
            Self::ManageProducts => "lista-gerenciar",
            Self::EditModal => "modal-editar",
            Self::EditForm => "form-editar",
            Self::EmployeeList => "usuariosLista",
            Self::EmployeeForm => "formCadastro",
            Self::AlertContainer => "alertContainer",
            Self::LoginError => "error-message",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A message for staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Message prefixed with the level's icon, as shown in dialogs.
    #[must_use]
    pub fn decorated(&self) -> String {
        match self.level {
            NoticeLevel::Success => format!("✅ {}", self.message),
            NoticeLevel::Error => format!("❌ {}", self.message),
            NoticeLevel::Info => self.message.clone(),
        }
    }
}

/// UI operations available to page controllers.
///
/// Implementations must be shareable across tasks: the dashboard poller
/// renders from spawned tasks.
pub trait Screen: Send + Sync {
    /// Replace the contents of `element` with `html`.
    fn render(&self, element: Element, html: String);

    /// Replace the text of `element`.
    fn set_text(&self, element: Element, text: String);

    /// Show or hide `element`.
    fn set_visible(&self, element: Element, visible: bool);

    /// Fill the named inputs of `form`.
    fn fill_form(&self, form: Element, values: Vec<(&'static str, String)>);

    /// Clear every input of `form`.
    fn reset_form(&self, form: Element);

    /// Show a blocking notice.
    fn notify(&self, notice: Notice);

    /// Show `notice` inside `element` and clear it after `duration`.
    fn flash(&self, element: Element, notice: Notice, duration: Duration);

    /// Ask a yes/no question. Returns `true` when the user accepts.
    fn confirm(&self, message: &str) -> bool;

    /// Navigate to `route` after `delay`.
    fn redirect(&self, route: Route, delay: Duration);
}

impl<S: Screen + ?Sized> Screen for std::sync::Arc<S> {
    fn render(&self, element: Element, html: String) {
        (**self).render(element, html);
    }

    fn set_text(&self, element: Element, text: String) {
        (**self).set_text(element, text);
    }

    fn set_visible(&self, element: Element, visible: bool) {
        (**self).set_visible(element, visible);
    }

    fn fill_form(&self, form: Element, values: Vec<(&'static str, String)>) {
        (**self).fill_form(form, values);
    }

    fn reset_form(&self, form: Element) {
        (**self).reset_form(form);
    }

    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }

    fn flash(&self, element: Element, notice: Notice, duration: Duration) {
        (**self).flash(element, notice, duration);
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn redirect(&self, route: Route, delay: Duration) {
        (**self).redirect(route, delay);
    }
}
