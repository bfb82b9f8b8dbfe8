//! In-process fake of the restaurant backend.
//!
//! Serves the same JSON endpoints, status codes and messages as the real
//! backend from in-memory tables, records every request line, and can be told
//! to fail specific routes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use comanda_client::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use url::Url;

/// Timestamp given to every record the fake creates.
pub const FIXED_TIMESTAMP: &str = "2026-01-15 12:30:00";

const VALID_STATUSES: [&str; 5] = ["Pendente", "Preparando", "Pronto", "Entregue", "Cancelado"];

type Shared = Arc<Mutex<BackendState>>;

#[derive(Debug, Clone, Serialize)]
struct StoredProduct {
    id: i64,
    nome: String,
    descricao: String,
    preco: f64,
}

#[derive(Debug, Clone, Serialize)]
struct StoredOrder {
    id: i64,
    status: String,
    data_pedido: String,
    itens: Value,
    total: f64,
}

#[derive(Debug, Clone, Serialize)]
struct StoredHistory {
    id: i64,
    pedido_id: i64,
    status: String,
    data_pedido: String,
    data_entrega: String,
    itens: Value,
    total: f64,
}

#[derive(Debug, Clone)]
struct StoredUser {
    id: i64,
    usuario: String,
    senha: String,
    tipo: String,
}

impl StoredUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "usuario": self.usuario,
            "tipo": self.tipo,
            "data_cadastro": FIXED_TIMESTAMP,
            "ativo": 1,
        })
    }
}

#[derive(Debug, Default)]
struct BackendState {
    users: Vec<StoredUser>,
    products: Vec<StoredProduct>,
    orders: Vec<StoredOrder>,
    history: Vec<StoredHistory>,
    /// Session token to username.
    sessions: HashMap<String, String>,
    requests: Vec<String>,
    /// `"METHOD /path"` to the status it should fail with.
    failures: HashMap<String, StatusCode>,
    next_user_id: i64,
    next_product_id: i64,
    next_order_id: i64,
    next_history_id: i64,
    next_token: u64,
}

impl BackendState {
    fn seeded() -> Self {
        let mut state = Self {
            next_user_id: 1,
            next_product_id: 1,
            next_order_id: 1,
            next_history_id: 1,
            next_token: 1,
            ..Self::default()
        };
        state.add_user("admin", "admin123", "admin");
        state.add_user("gerente", "gerente123", "gerente");
        state
    }

    fn add_user(&mut self, usuario: &str, senha: &str, tipo: &str) {
        self.users.push(StoredUser {
            id: self.next_user_id,
            usuario: usuario.to_string(),
            senha: senha.to_string(),
            tipo: tipo.to_string(),
        });
        self.next_user_id += 1;
    }

    fn add_product(&mut self, nome: &str, descricao: &str, preco: f64) -> StoredProduct {
        let product = StoredProduct {
            id: self.next_product_id,
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            preco,
        };
        self.next_product_id += 1;
        self.products.push(product.clone());
        product
    }

    fn add_order(&mut self, itens: Value, total: f64, status: &str) -> StoredOrder {
        let order = StoredOrder {
            id: self.next_order_id,
            status: status.to_string(),
            data_pedido: FIXED_TIMESTAMP.to_string(),
            itens,
            total,
        };
        self.next_order_id += 1;
        self.orders.push(order.clone());
        order
    }

    fn archive(&mut self, order: &StoredOrder) {
        // Most recent delivery first.
        self.history.insert(
            0,
            StoredHistory {
                id: self.next_history_id,
                pedido_id: order.id,
                status: "Entregue".to_string(),
                data_pedido: order.data_pedido.clone(),
                data_entrega: FIXED_TIMESTAMP.to_string(),
                itens: order.itens.clone(),
                total: order.total,
            },
        );
        self.next_history_id += 1;
    }

    fn session_user(&self, headers: &HeaderMap) -> Option<StoredUser> {
        let token = session_token(headers)?;
        let usuario = self.sessions.get(token)?;
        self.users.iter().find(|u| &u.usuario == usuario).cloned()
    }

    fn require_auth(&self, headers: &HeaderMap) -> Result<StoredUser, Response> {
        self.session_user(headers)
            .ok_or_else(|| erro(StatusCode::UNAUTHORIZED, "Não autorizado"))
    }

    fn require_admin(&self, headers: &HeaderMap, denied: &str) -> Result<StoredUser, Response> {
        match self.session_user(headers) {
            Some(user) if user.tipo == "admin" => Ok(user),
            _ => Err(erro(StatusCode::FORBIDDEN, denied)),
        }
    }
}

/// Handle to a running fake backend.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
}

impl FakeBackend {
    /// Bind a random local port and start serving.
    ///
    /// Two accounts exist from the start: `admin`/`admin123` (admin) and
    /// `gerente`/`gerente123` (gerente).
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake backend address");

        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        tracing::debug!(%addr, "Fake backend listening");
        Self { addr, state }
    }

    /// Base URL of the backend.
    ///
    /// # Panics
    ///
    /// Never in practice: the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Socket address is a valid URL")
    }

    /// A fresh client with its own cookie store.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.url()).expect("Failed to build API client")
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request lines received so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Whether a request matching `line` was received.
    #[must_use]
    pub fn received(&self, line: &str) -> bool {
        self.lock().requests.iter().any(|r| r == line)
    }

    /// Number of requests matching `line`.
    #[must_use]
    pub fn count(&self, line: &str) -> usize {
        self.lock().requests.iter().filter(|r| *r == line).count()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Make `method path` answer `status` with an `erro` body from now on.
    pub fn fail_with(&self, method: &str, path: &str, status: StatusCode) {
        self.lock()
            .failures
            .insert(format!("{method} {path}"), status);
    }

    /// Forget every session, as if they all expired.
    pub fn expire_sessions(&self) {
        self.lock().sessions.clear();
    }

    /// Add a product and return its id.
    pub fn seed_product(&self, nome: &str, descricao: &str, preco: f64) -> i64 {
        self.lock().add_product(nome, descricao, preco).id
    }

    /// Add an active order and return its id.
    pub fn seed_order(&self, itens: Value, total: f64, status: &str) -> i64 {
        self.lock().add_order(itens, total, status).id
    }

    /// Archive a delivered order with a single line of `total`.
    pub fn seed_history(&self, total: f64) {
        let mut state = self.lock();
        let order = StoredOrder {
            id: state.next_order_id,
            status: "Entregue".to_string(),
            data_pedido: FIXED_TIMESTAMP.to_string(),
            itens: json!([{"nome": "Prato do dia", "preco": total}]),
            total,
        };
        state.next_order_id += 1;
        state.archive(&order);
    }

    /// Status of an order, if it still exists.
    #[must_use]
    pub fn order_status(&self, id: i64) -> Option<String> {
        self.lock()
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status.clone())
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    #[must_use]
    pub fn history_count(&self) -> usize {
        self.lock().history.len()
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }

    /// Name and price of a product, if it exists.
    #[must_use]
    pub fn product(&self, id: i64) -> Option<(String, f64)> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.nome.clone(), p.preco))
    }

    /// Whether an account named `usuario` exists.
    #[must_use]
    pub fn has_user(&self, usuario: &str) -> bool {
        self.lock().users.iter().any(|u| u.usuario == usuario)
    }

    /// Body of the most recently created order.
    #[must_use]
    pub fn last_order(&self) -> Option<Value> {
        self.lock()
            .orders
            .last()
            .and_then(|o| serde_json::to_value(o).ok())
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/verificar-auth", get(check_auth))
        .route("/api/usuarios", get(list_users).post(create_user))
        .route("/api/usuarios/{usuario}", delete(remove_user))
        .route("/api/produtos", get(list_products).post(create_product))
        .route(
            "/api/produtos/{id}",
            put(update_product).delete(delete_product),
        )
        .route("/api/pedidos", get(list_orders).post(create_order))
        .route("/api/pedidos/{id}/status", put(update_status))
        .route("/api/pedidos/{id}", delete(delete_order))
        .route(
            "/api/pedidos/historico",
            get(list_history).delete(clear_history),
        )
        .route("/api/estatisticas", get(statistics))
        .route("/api/resetar-ids", post(reset))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_request,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log the request line and apply any injected failure.
async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    let failure = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(line.clone());
        state.failures.get(&line).copied()
    };

    if let Some(status) = failure {
        tracing::debug!(%line, %status, "Injected failure");
        return erro(status, "Falha simulada");
    }
    next.run(request).await
}

fn erro(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "erro": message }))).into_response()
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("session="))
        .filter(|token| !token.is_empty())
}

fn locked(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Session
// =============================================================================

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    usuario: String,
    #[serde(default)]
    senha: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = locked(&state);
    let Some(user) = state
        .users
        .iter()
        .find(|u| u.usuario == body.usuario && u.senha == body.senha)
        .cloned()
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"sucesso": false, "mensagem": "Usuário ou senha inválidos"})),
        )
            .into_response();
    };

    let token = format!("tok-{}", state.next_token);
    state.next_token += 1;
    state.sessions.insert(token.clone(), user.usuario.clone());

    let mut response = Json(json!({
        "sucesso": true,
        "mensagem": format!("Bem-vindo, {}!", user.usuario),
        "tipo": user.tipo,
    }))
    .into_response();
    if let Ok(cookie) = HeaderValue::from_str(&format!("session={token}; Path=/; HttpOnly")) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        locked(&state).sessions.remove(token);
    }
    let mut response =
        Json(json!({"sucesso": true, "mensagem": "Logout realizado com sucesso"})).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; Max-Age=0"),
    );
    response
}

async fn check_auth(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match locked(&state).session_user(&headers) {
        Some(user) => Json(json!({
            "autenticado": true,
            "usuario": user.usuario,
            "tipo": user.tipo,
        }))
        .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({"autenticado": false}))).into_response(),
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Deserialize)]
struct NewUser {
    #[serde(default)]
    usuario: String,
    #[serde(default)]
    senha: String,
    #[serde(default = "default_tipo")]
    tipo: String,
}

fn default_tipo() -> String {
    "gerente".to_string()
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = locked(&state);
    if let Err(denied) =
        state.require_admin(&headers, "Apenas administradores podem listar usuários")
    {
        return denied;
    }
    let users: Vec<Value> = state.users.iter().map(StoredUser::to_json).collect();
    Json(users).into_response()
}

async fn create_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewUser>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) =
        state.require_admin(&headers, "Apenas administradores podem cadastrar usuários")
    {
        return denied;
    }

    let usuario = body.usuario.trim();
    if usuario.chars().count() < 3 {
        return erro(
            StatusCode::BAD_REQUEST,
            "Nome de usuário deve ter no mínimo 3 caracteres",
        );
    }
    if body.senha.chars().count() < 6 {
        return erro(
            StatusCode::BAD_REQUEST,
            "Senha deve ter no mínimo 6 caracteres",
        );
    }
    if body.tipo != "admin" && body.tipo != "gerente" {
        return erro(StatusCode::BAD_REQUEST, "Tipo de usuário inválido");
    }
    if state.users.iter().any(|u| u.usuario == usuario) {
        return erro(StatusCode::BAD_REQUEST, "Usuário já existe");
    }

    state.add_user(usuario, &body.senha, &body.tipo);
    (
        StatusCode::CREATED,
        Json(json!({
            "sucesso": true,
            "mensagem": format!("Usuário {usuario} cadastrado com sucesso!"),
            "usuario": usuario,
            "tipo": body.tipo,
        })),
    )
        .into_response()
}

async fn remove_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(usuario): Path<String>,
) -> Response {
    let mut state = locked(&state);
    let admin = match state.require_admin(&headers, "Apenas administradores podem remover usuários")
    {
        Ok(admin) => admin,
        Err(denied) => return denied,
    };

    if admin.usuario == usuario {
        return erro(
            StatusCode::BAD_REQUEST,
            "Você não pode remover sua própria conta",
        );
    }
    let Some(position) = state.users.iter().position(|u| u.usuario == usuario) else {
        return erro(StatusCode::NOT_FOUND, "Usuário não encontrado");
    };
    let admins = state.users.iter().filter(|u| u.tipo == "admin").count();
    if state.users.get(position).is_some_and(|u| u.tipo == "admin") && admins <= 1 {
        return erro(
            StatusCode::BAD_REQUEST,
            "Não é possível remover o último administrador",
        );
    }

    state.users.remove(position);
    state.sessions.retain(|_, owner| *owner != usuario);
    Json(json!({"sucesso": true, "mensagem": "Usuário removido com sucesso!"})).into_response()
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
struct ProductBody {
    #[serde(default)]
    nome: String,
    #[serde(default)]
    descricao: String,
    preco: Option<f64>,
}

async fn list_products(State(state): State<Shared>) -> Response {
    Json(locked(&state).products.clone()).into_response()
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ProductBody>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    let Some(preco) = body.preco.filter(|_| !body.nome.is_empty() && !body.descricao.is_empty())
    else {
        return erro(StatusCode::BAD_REQUEST, "Dados incompletos");
    };
    if preco < 0.0 {
        return erro(StatusCode::BAD_REQUEST, "Preço deve ser positivo");
    }

    let product = state.add_product(&body.nome, &body.descricao, preco);
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<ProductBody>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    let Some(preco) = body.preco else {
        return erro(
            StatusCode::BAD_REQUEST,
            "Dados inválidos: preço deve ser um número válido",
        );
    };
    let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
        return erro(StatusCode::NOT_FOUND, "Produto não encontrado");
    };

    product.nome = body.nome;
    product.descricao = body.descricao;
    product.preco = preco;
    Json(product.clone()).into_response()
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return erro(StatusCode::NOT_FOUND, "Produto não encontrado");
    }
    Json(json!({"mensagem": "Produto removido"})).into_response()
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
struct OrderBody {
    itens: Option<Value>,
    total: Option<f64>,
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: String,
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    // Newest first, delivered and cancelled orders hidden.
    let active: Vec<&StoredOrder> = state
        .orders
        .iter()
        .rev()
        .filter(|o| o.status != "Entregue" && o.status != "Cancelado")
        .collect();
    Json(active).into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<OrderBody>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    let itens = body
        .itens
        .filter(|itens| itens.as_array().is_some_and(|a| !a.is_empty()));
    let (Some(itens), Some(total)) = (itens, body.total.filter(|t| *t != 0.0)) else {
        return erro(StatusCode::BAD_REQUEST, "Dados incompletos");
    };

    let order = state.add_order(itens, total, "Pendente");
    (
        StatusCode::CREATED,
        Json(json!({"sucesso": true, "pedido": order})),
    )
        .into_response()
}

async fn update_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    if !VALID_STATUSES.contains(&body.status.as_str()) {
        return erro(StatusCode::BAD_REQUEST, "Status inválido");
    }
    let Some(order) = state.orders.iter_mut().find(|o| o.id == id) else {
        return erro(StatusCode::NOT_FOUND, "Pedido não encontrado");
    };

    order.status = body.status;
    let order = order.clone();
    if order.status == "Entregue" {
        state.archive(&order);
    }
    Json(order).into_response()
}

async fn delete_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = locked(&state);
    if let Err(denied) =
        state.require_admin(&headers, "Apenas administradores podem deletar pedidos")
    {
        return denied;
    }
    let before = state.orders.len();
    state.orders.retain(|o| o.id != id);
    if state.orders.len() == before {
        return erro(StatusCode::NOT_FOUND, "Pedido não encontrado");
    }
    Json(json!({"mensagem": "Pedido deletado com sucesso"})).into_response()
}

async fn list_history(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    Json(state.history.clone()).into_response()
}

async fn clear_history(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    if let Err(denied) =
        state.require_admin(&headers, "Apenas administradores podem limpar o histórico")
    {
        return denied;
    }
    let removed = state.history.len();
    state.history.clear();
    state.next_history_id = 1;
    Json(json!({
        "sucesso": true,
        "mensagem": format!("{removed} registro(s) removido(s) do histórico"),
    }))
    .into_response()
}

async fn reset(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    if let Err(denied) =
        state.require_admin(&headers, "Apenas administradores podem resetar contadores")
    {
        return denied;
    }
    state.orders.clear();
    state.history.clear();
    state.products.clear();
    state.next_order_id = 1;
    state.next_history_id = 1;
    state.next_product_id = 1;
    Json(json!({
        "sucesso": true,
        "mensagem": "✅ Sistema resetado! Todos os pedidos, histórico e produtos foram deletados.",
    }))
    .into_response()
}

async fn statistics(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = locked(&state);
    if let Err(denied) = state.require_auth(&headers) {
        return denied;
    }
    let today = FIXED_TIMESTAMP.get(..10).unwrap_or_default();
    let total_pedidos = state.history.len();
    let receita_total: f64 = state.history.iter().map(|h| h.total).sum();
    let delivered_today: Vec<&StoredHistory> = state
        .history
        .iter()
        .filter(|h| h.data_entrega.starts_with(today))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let ticket_medio = if total_pedidos > 0 {
        receita_total / total_pedidos as f64
    } else {
        0.0
    };
    Json(json!({
        "total_pedidos": total_pedidos,
        "receita_total": receita_total,
        "ticket_medio": ticket_medio,
        "pedidos_hoje": delivered_today.len(),
        "receita_hoje": delivered_today.iter().map(|h| h.total).sum::<f64>(),
    }))
    .into_response()
}

