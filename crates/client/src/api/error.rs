//! Error types for backend API calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the restaurant backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, reset, DNS, ...).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        /// `erro` or `mensagem` from the response body, when present.
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the session is missing or expired.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Whether the failure happened below HTTP.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Message to show staff: the backend's own message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
