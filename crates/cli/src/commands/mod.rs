//! Subcommand implementations.
//!
//! Each command opens the page it acts on, drives it through typed events
//! and turns the resulting outcome into a process result. Notices and
//! fragments are already on the terminal by then.

pub mod employees;
pub mod menu;
pub mod orders;
pub mod products;
pub mod session;

use std::sync::Arc;

use comanda_client::pages::{Outcome, PageError, PageLoad};
use comanda_client::{ApiClient, ApiError, ClientConfig, ConfigError, Route};
use thiserror::Error;

use crate::screen::TerminalScreen;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Page(#[from] PageError),

    /// Sign-in was required but no user was given.
    #[error("No staff user given: pass --usuario or set COMANDA_USUARIO")]
    MissingUser,

    /// The page sent the user elsewhere instead of loading.
    #[error("Page unavailable, redirected to {0}")]
    Redirected(Route),
}

/// Everything a command needs.
pub struct Context {
    pub api: ApiClient,
    pub config: ClientConfig,
    pub screen: Arc<TerminalScreen>,
    /// Staff user to sign in as before opening a staff page.
    pub usuario: Option<String>,
}

impl Context {
    /// Sign in with `--usuario` and `COMANDA_SENHA`.
    ///
    /// The backend session lives only as long as this process, so every
    /// staff command signs in first.
    pub async fn sign_in(&self) -> Result<(), CommandError> {
        let usuario = self.usuario.as_deref().ok_or(CommandError::MissingUser)?;
        session::login(self, usuario).await
    }
}

/// Unwrap a page load, failing the command on redirect.
pub fn ready<P>(load: PageLoad<P>) -> Result<P, CommandError> {
    match load {
        PageLoad::Ready(page) => Ok(page),
        PageLoad::Redirected(route) => Err(CommandError::Redirected(route)),
    }
}

/// Turn an outcome into a command result. A declined prompt is not a failure.
pub fn finish<T>(outcome: Outcome<T>) -> Result<Option<T>, CommandError> {
    match outcome {
        Outcome::Completed(value) => Ok(Some(value)),
        Outcome::Declined => {
            tracing::info!("Nothing done");
            Ok(None)
        }
        Outcome::Failed(e) => Err(e.into()),
    }
}
