//! Staff login form.

use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use super::{CONNECTION_ERROR, Outcome, PageError};
use crate::api::{ApiClient, LoginRequest};
use crate::screen::{Element, Notice, Route, Screen};

/// How long a rejected login message stays visible.
const ERROR_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub struct LoginPage<S> {
    api: ApiClient,
    screen: S,
}

impl<S: Screen> LoginPage<S> {
    pub const fn new(api: ApiClient, screen: S) -> Self {
        Self { api, screen }
    }

    /// Submit credentials. On success the session cookie is stored in the
    /// client and the user is sent to the order dashboard.
    #[instrument(skip(self, senha))]
    pub async fn submit(&self, usuario: &str, senha: SecretString) -> Outcome {
        let request = LoginRequest {
            usuario: usuario.to_string(),
            senha,
        };

        match self.api.login(&request).await {
            Ok(response) => {
                info!(usuario, "Logged in");
                let message = response.text().unwrap_or("Login realizado com sucesso!");
                self.screen.notify(Notice::success(message));
                self.screen.redirect(Route::Orders, Duration::ZERO);
                Outcome::Completed(())
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Login request failed");
                self.screen
                    .set_text(Element::LoginError, format!("❌ {CONNECTION_ERROR}"));
                self.screen.set_visible(Element::LoginError, true);
                Outcome::Failed(e.into())
            }
            Err(e) => {
                warn!(error = %e, "Login rejected");
                let notice = Notice::error(e.user_message("Usuário ou senha inválidos"));
                self.screen.flash(Element::LoginError, notice, ERROR_DISPLAY);
                Outcome::Failed(PageError::Api(e))
            }
        }
    }
}
