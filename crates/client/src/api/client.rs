//! REST client for the restaurant backend.
//!
//! Every request goes through one `reqwest::Client` with a cookie store, so
//! the session cookie set by `/api/login` rides along on later calls.

use comanda_core::{OrderId, OrderStatus, ProductId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::types::{
    ApiMessage, AuthStatus, CreatedOrder, Employee, HistoryEntry, LoginRequest, NewEmployee,
    NewOrder, Order, Product, ProductInput, Statistics, StatusUpdate,
};

/// Backend API client.
///
/// Cheap to clone: clones share the connection pool and the cookie store.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client with session cookie store.
    client: Client,
    /// Backend base URL, always ending in `/`.
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Ask the backend whether the current session is authenticated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 when there is no session.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> Result<AuthStatus, ApiError> {
        Self::send_json(self.client.get(self.url("api/verificar-auth")?))
            .await
    }

    /// Log in and store the session cookie.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `mensagem` on bad credentials.
    #[instrument(skip(self, request), fields(usuario = %request.usuario))]
    pub async fn login(&self, request: &LoginRequest) -> Result<ApiMessage, ApiError> {
        Self::send_json(self.client.post(self.url("api/login")?).json(request))
            .await
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        Self::send_unit(self.client.post(self.url("api/logout")?))
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List the menu.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Self::send_json(self.client.get(self.url("api/produtos")?))
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the input.
    #[instrument(skip(self, input), fields(nome = %input.nome))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        Self::send_json(self.client.post(self.url("api/produtos")?).json(input))
            .await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the product does not exist.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("api/produtos/{id}"))?;
        Self::send_unit(self.client.put(url).json(input)).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let url = self.url(&format!("api/produtos/{id}"))?;
        Self::send_unit(self.client.delete(url)).await
    }

    // =========================================================================
    // Employees
    // =========================================================================

    /// List employee accounts (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 403 for non-admin sessions.
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        Self::send_json(self.client.get(self.url("api/usuarios")?))
            .await
    }

    /// Register an employee (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `erro` on validation failures.
    #[instrument(skip(self, employee), fields(usuario = %employee.usuario, tipo = %employee.tipo))]
    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<ApiMessage, ApiError> {
        Self::send_json(self.client.post(self.url("api/usuarios")?).json(employee))
            .await
    }

    /// Remove an employee account (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `erro` when removal is refused.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, usuario: &str) -> Result<ApiMessage, ApiError> {
        let mut url = self.url("api/usuarios/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Decode("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(usuario);
        Self::send_json(self.client.delete(url)).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List active orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 when the session expired.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        Self::send_json(self.client.get(self.url("api/pedidos")?))
            .await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the order.
    #[instrument(skip(self, order), fields(items = order.itens.len(), total = %order.total))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, ApiError> {
        Self::send_json(self.client.post(self.url("api/pedidos")?).json(order))
            .await
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the status.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("api/pedidos/{id}/status"))?;
        Self::send_unit(self.client.put(url).json(&StatusUpdate { status }))
            .await
    }

    /// Remove an order permanently (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `erro` when refused.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<ApiMessage, ApiError> {
        let url = self.url(&format!("api/pedidos/{id}"))?;
        Self::send_json(self.client.delete(url)).await
    }

    /// List delivered orders, most recent delivery first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        Self::send_json(self.client.get(self.url("api/pedidos/historico")?))
            .await
    }

    /// Delete the whole history archive (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `erro` when refused.
    #[instrument(skip(self))]
    pub async fn clear_history(&self) -> Result<ApiMessage, ApiError> {
        Self::send_json(self.client.delete(self.url("api/pedidos/historico")?))
            .await
    }

    /// Delete all orders, history and products and restart the counters (admin only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the backend's `erro` when refused.
    #[instrument(skip(self))]
    pub async fn reset_system(&self) -> Result<ApiMessage, ApiError> {
        Self::send_json(self.client.post(self.url("api/resetar-ids")?))
            .await
    }

    /// Fetch aggregate sales figures.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<Statistics, ApiError> {
        Self::send_json(self.client.get(self.url("api/estatisticas")?))
            .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_unit(request: RequestBuilder) -> Result<(), ApiError> {
        Self::send(request).await.map(drop)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = %status, url = %response.url(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are usually `{erro}` or `{mensagem}` but may be empty.
        let message = response
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|body| body.text().map(String::from));
        warn!(status = %status, message = ?message, "Backend rejected request");
        Err(ApiError::Status { status, message })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
