//! Request and response types for the restaurant backend.
//!
//! Field names follow the backend's JSON keys (Portuguese) so the structs can
//! be (de)serialised without renames.

use comanda_core::{EmployeeId, HistoryEntryId, OrderId, OrderStatus, Price, ProductId, Role};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Session
// =============================================================================

/// Body of `GET /api/verificar-auth`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub autenticado: bool,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub tipo: Option<Role>,
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub usuario: String,
    #[serde(serialize_with = "expose_secret")]
    pub senha: SecretString,
}

/// Generic `{mensagem}` / `{erro}` envelope returned by mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub mensagem: Option<String>,
    #[serde(default)]
    pub erro: Option<String>,
}

impl ApiMessage {
    /// The most specific message in the envelope, preferring `erro`.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.erro.as_deref().or(self.mensagem.as_deref())
    }
}

// =============================================================================
// Products
// =============================================================================

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    pub preco: Price,
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    pub nome: String,
    pub descricao: String,
    pub preco: Price,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            nome: product.nome.clone(),
            descricao: product.descricao.clone(),
            preco: product.preco,
        }
    }
}

// =============================================================================
// Employees
// =============================================================================

/// An employee account as listed by `GET /api/usuarios`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: Option<EmployeeId>,
    pub usuario: String,
    #[serde(default)]
    pub tipo: Role,
    #[serde(default)]
    pub data_cadastro: Option<String>,
    #[serde(default)]
    pub ativo: Option<serde_json::Value>,
}

/// Body of `POST /api/usuarios`.
#[derive(Debug, Clone, Serialize)]
pub struct NewEmployee {
    pub usuario: String,
    #[serde(serialize_with = "expose_secret")]
    pub senha: SecretString,
    pub tipo: Role,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub nome: String,
    #[serde(default)]
    pub preco: Price,
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantidade: Option<u32>,
}

impl OrderItem {
    /// Quantity for pricing. Missing or zero quantities count as one unit.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        match self.quantidade {
            Some(q) if q > 0 => q,
            _ => 1,
        }
    }

    /// `preco * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.preco * self.effective_quantity()
    }
}

/// An active order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub data_pedido: Option<String>,
    #[serde(default)]
    pub itens: Vec<OrderItem>,
    #[serde(default)]
    pub total: Price,
}

/// Body of `POST /api/pedidos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub itens: Vec<OrderItem>,
    pub total: Price,
}

/// Response of `POST /api/pedidos`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    #[serde(default)]
    pub pedido: Option<Order>,
}

/// Body of `PUT /api/pedidos/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// A delivered order kept in the history archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    #[serde(default)]
    pub pedido_id: Option<OrderId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub data_pedido: Option<String>,
    #[serde(default)]
    pub data_entrega: Option<String>,
    #[serde(default)]
    pub itens: Vec<OrderItem>,
    #[serde(default)]
    pub total: Price,
}

impl HistoryEntry {
    /// Number shown to staff: the originating order id when known.
    #[must_use]
    pub fn display_number(&self) -> i64 {
        self.pedido_id
            .map_or_else(|| self.id.as_i64(), |id| id.as_i64())
    }
}

/// Aggregates returned by `GET /api/estatisticas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_pedidos: u64,
    #[serde(default)]
    pub receita_total: Price,
    #[serde(default)]
    pub ticket_medio: Price,
    #[serde(default)]
    pub pedidos_hoje: u64,
    #[serde(default)]
    pub receita_hoje: Price,
}

/// Whole quantities given as integers, integral floats or numeric strings.
/// Anything else reads as missing.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(amount
        .filter(Decimal::is_integer)
        .and_then(|amount| amount.to_u32()))
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_subtotal_defaults_quantity() {
        let item: OrderItem = serde_json::from_str(r#"{"nome":"X","preco":10,"quantidade":3}"#).unwrap();
        assert_eq!(item.subtotal().display(), "R$ 30.00");

        let single: OrderItem = serde_json::from_str(r#"{"nome":"Y","preco":4.5}"#).unwrap();
        assert_eq!(single.effective_quantity(), 1);
        assert_eq!(single.subtotal().display(), "R$ 4.50");

        let zero: OrderItem = serde_json::from_str(r#"{"nome":"Z","preco":2,"quantidade":0}"#).unwrap();
        assert_eq!(zero.effective_quantity(), 1);
    }

    #[test]
    fn test_order_item_quantity_is_lenient() {
        let parse = |raw: &str| -> OrderItem {
            serde_json::from_str(&format!(r#"{{"nome":"X","preco":2,"quantidade":{raw}}}"#)).unwrap()
        };
        assert_eq!(parse("2.0").quantidade, Some(2));
        assert_eq!(parse(r#""3""#).quantidade, Some(3));
        assert_eq!(parse("null").quantidade, None);
        assert_eq!(parse("1.5").effective_quantity(), 1);
        assert_eq!(parse(r#""muitos""#).effective_quantity(), 1);
        assert_eq!(parse("-4").effective_quantity(), 1);
        assert_eq!(parse("[1]").effective_quantity(), 1);
    }

    #[test]
    fn test_extreme_quantity_does_not_overflow() {
        let item: OrderItem = serde_json::from_str(
            r#"{"nome":"X","preco":"100000000000000000000","quantidade":4000000000}"#,
        )
        .unwrap();
        assert_eq!(item.subtotal().amount(), Decimal::MAX);
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let order: Order = serde_json::from_str(r#"{"id":1,"itens":[],"total":1}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);

        let entry: HistoryEntry = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert_eq!(entry.status, OrderStatus::Unknown);
    }

    #[test]
    fn test_order_parses_backend_row() {
        let json = r#"{
            "id": 3,
            "status": "Pronto",
            "data_pedido": "2024-05-01 12:30:00",
            "itens_json": "[]",
            "itens": [{"id": 1, "nome": "Pastel", "preco": 8.0}],
            "total": 8.0,
            "data_entrega": null
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId::new(3));
        assert_eq!(order.status, OrderStatus::Pronto);
        assert_eq!(order.itens.len(), 1);
        assert_eq!(order.total.display(), "R$ 8.00");
    }

    #[test]
    fn test_history_prefers_pedido_id() {
        let json = r#"{"id": 1, "pedido_id": 17, "itens": [], "total": 0}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_number(), 17);

        let json = r#"{"id": 4, "itens": [], "total": 0}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_number(), 4);
    }

    #[test]
    fn test_login_request_exposes_password_only_on_the_wire() {
        let request = LoginRequest {
            usuario: "ana".to_string(),
            senha: SecretString::from("segredo123"),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["senha"], "segredo123");
        assert!(!format!("{request:?}").contains("segredo123"));
    }

    #[test]
    fn test_auth_status_defaults() {
        let status: AuthStatus = serde_json::from_str(r#"{"autenticado": false}"#).unwrap();
        assert!(!status.autenticado);
        assert!(status.usuario.is_none());
        assert!(status.tipo.is_none());
    }

    #[test]
    fn test_api_message_prefers_error() {
        let message = ApiMessage {
            mensagem: Some("ok".to_string()),
            erro: Some("falhou".to_string()),
        };
        assert_eq!(message.text(), Some("falhou"));
        assert_eq!(ApiMessage::default().text(), None);
    }
}
