//! Integration test support for Comanda.
//!
//! Tests drive the page controllers of `comanda-client` against
//! [`FakeBackend`], an in-process axum server that mimics the restaurant
//! backend, and assert on what the pages did through [`RecordingScreen`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p comanda-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - Login and session checks
//! - `dashboard` - Order dashboard, history and admin actions
//! - `cart` - Menu browsing and order placement
//! - `products` - Product registration and management
//! - `employees` - Employee management

#![cfg_attr(not(test), forbid(unsafe_code))]

mod backend;
mod screen;

pub use backend::{FIXED_TIMESTAMP, FakeBackend};
pub use screen::{RecordingScreen, ScreenEvent};

use comanda_client::ApiClient;
use secrecy::SecretString;

/// Log `client` in as `usuario`.
///
/// # Panics
///
/// Panics if the backend rejects the credentials.
pub async fn signed_in(client: &ApiClient, usuario: &str, senha: &str) {
    let request = comanda_client::api::LoginRequest {
        usuario: usuario.to_string(),
        senha: SecretString::from(senha.to_string()),
    };
    client
        .login(&request)
        .await
        .expect("Seeded credentials should be accepted");
}

/// A client logged in as the seeded admin.
pub async fn admin_client(backend: &FakeBackend) -> ApiClient {
    let client = backend.client();
    signed_in(&client, "admin", "admin123").await;
    client
}

/// A client logged in as the seeded gerente.
pub async fn manager_client(backend: &FakeBackend) -> ApiClient {
    let client = backend.client();
    signed_in(&client, "gerente", "gerente123").await;
    client
}
