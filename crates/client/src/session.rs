//! Session check shared by every staff page.
//!
//! The check only reports what the backend said. Navigating away on an
//! unauthenticated result is the page controller's decision.

use comanda_core::Role;
use tracing::{debug, instrument, warn};

use crate::api::ApiClient;

/// An authenticated staff session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub usuario: String,
    pub role: Role,
}

impl Session {
    /// Whether admin-only controls should be offered.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Result of asking the backend about the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Authenticated(Session),
    Unauthenticated,
}

impl SessionCheck {
    /// The session, if authenticated.
    #[must_use]
    pub fn session(self) -> Option<Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unauthenticated => None,
        }
    }
}

/// Ask the backend whether the caller is logged in.
///
/// Any failure (non-success status, transport error, malformed body, or a
/// body with `autenticado: false`) counts as unauthenticated. A missing role
/// defaults to `gerente`.
#[instrument(skip(api))]
pub async fn check_session(api: &ApiClient) -> SessionCheck {
    match api.check_auth().await {
        Ok(status) if status.autenticado => {
            let session = Session {
                usuario: status.usuario.unwrap_or_default(),
                role: status.tipo.unwrap_or_default(),
            };
            debug!(usuario = %session.usuario, role = %session.role, "Session active");
            SessionCheck::Authenticated(session)
        }
        Ok(_) => {
            debug!("Backend reports no session");
            SessionCheck::Unauthenticated
        }
        Err(e) => {
            if e.is_unauthorized() {
                debug!("Session missing or expired");
            } else {
                warn!(error = %e, "Session check failed");
            }
            SessionCheck::Unauthenticated
        }
    }
}
