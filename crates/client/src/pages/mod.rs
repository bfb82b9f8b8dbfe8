//! Page controllers.
//!
//! One controller per staff or public page. Controllers fetch from the
//! backend, render view models through the [`Screen`], and react to typed
//! events coming from the rendered `data-action` attributes.
//!
//! # Conventions
//!
//! - Staff pages are created through an async `init` that runs the session
//!   check first. A missing session redirects to the login page and nothing
//!   else is fetched.
//! - Operations return an [`Outcome`] so callers can tell a completed action
//!   from one the user declined at a confirmation prompt. Failures are
//!   already surfaced on the screen by the time the outcome is returned.

mod employees;
mod landing;
mod login;
mod orders;
mod products;

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

pub use employees::{EmployeeEvent, EmployeeForm, EmployeesPage};
pub use landing::{CartEvent, LandingPage, Section};
pub use login::LoginPage;
pub use orders::{DashboardEvent, OrdersDashboard};
pub use products::{ProductEvent, ProductForm, ProductManagementPage, ProductRegistrationPage};

use crate::api::{ApiClient, ApiError};
use crate::screen::{Route, Screen};
use crate::session::{self, Session, SessionCheck};
use crate::views::ViewError;

/// Generic message for transport failures.
pub const CONNECTION_ERROR: &str = "Erro ao conectar com o servidor!";

/// Errors that end a page operation.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    View(#[from] ViewError),

    /// Form input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// An event referenced a record the page has not loaded.
    #[error("Unknown record: {0}")]
    NotLoaded(String),
}

impl PageError {
    /// Message to show staff, preferring the backend's own wording.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) if e.is_transport() => CONNECTION_ERROR.to_string(),
            Self::Api(e) => e.user_message(fallback),
            Self::Invalid(message) => message.clone(),
            Self::View(_) | Self::NotLoaded(_) => fallback.to_string(),
        }
    }
}

/// What happened to a page operation.
#[derive(Debug)]
pub enum Outcome<T = ()> {
    /// The operation ran to completion.
    Completed(T),
    /// The user declined a confirmation, or there was nothing to do.
    /// No request was sent.
    Declined,
    /// The operation failed.
    Failed(PageError),
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub const fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Map the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Completed(value) => Outcome::Completed(f(value)),
            Self::Declined => Outcome::Declined,
            Self::Failed(e) => Outcome::Failed(e),
        }
    }

    /// The completed value, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Declined | Self::Failed(_) => None,
        }
    }
}

impl<T, E: Into<PageError>> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(e) => Self::Failed(e.into()),
        }
    }
}

/// Result of initialising a staff page.
#[derive(Debug)]
pub enum PageLoad<P> {
    /// The page is usable.
    Ready(P),
    /// The user was sent elsewhere; nothing was loaded.
    Redirected(Route),
}

impl<P> PageLoad<P> {
    /// The page, if it loaded.
    pub fn ready(self) -> Option<P> {
        match self {
            Self::Ready(page) => Some(page),
            Self::Redirected(_) => None,
        }
    }

    /// Where the user was sent, if redirected.
    #[must_use]
    pub const fn redirected_to(&self) -> Option<Route> {
        match self {
            Self::Ready(_) => None,
            Self::Redirected(route) => Some(*route),
        }
    }
}

/// Check the session and send the user to the login page without one.
pub(crate) async fn require_session<S: Screen>(api: &ApiClient, screen: &S) -> Option<Session> {
    match session::check_session(api).await {
        SessionCheck::Authenticated(session) => Some(session),
        SessionCheck::Unauthenticated => {
            debug!("No session, redirecting to login");
            screen.redirect(Route::Login, Duration::ZERO);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let ok: Outcome<u8> = Ok::<u8, ApiError>(3).into();
        assert_eq!(ok.completed(), Some(3));

        let failed: Outcome<u8> = Err::<u8, _>(ApiError::Decode("x".to_string())).into();
        assert!(failed.is_failed());
        assert!(Outcome::<u8>::Declined.map(|v| v + 1).is_declined());
    }

    #[test]
    fn test_page_error_messages() {
        let err = PageError::from(ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Usuário já existe".to_string()),
        });
        assert_eq!(err.user_message("Erro ao cadastrar"), "Usuário já existe");

        let err = PageError::Invalid("Preço inválido!".to_string());
        assert_eq!(err.user_message("Erro"), "Preço inválido!");

        let err = PageError::NotLoaded("produto 9".to_string());
        assert_eq!(err.user_message("Erro"), "Erro");
    }
}
