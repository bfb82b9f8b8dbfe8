//! Order dashboard fragments: active orders, history and counters.

use askama::Template;
use comanda_core::{OrderStatus, Price};

use super::ViewError;
use super::format::format_timestamp;
use crate::api::{HistoryEntry, Order, OrderItem};

// =============================================================================
// Actions
// =============================================================================

/// An action the dashboard offers on an order card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Move the order to the given status.
    Advance(OrderStatus),
    /// Remove the order permanently.
    Cancel,
}

impl OrderAction {
    /// Value of the button's `data-action` attribute.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Advance(_) => "advance",
            Self::Cancel => "cancel",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Advance(OrderStatus::Preparando) => "Preparar",
            Self::Advance(OrderStatus::Pronto) => "Marcar como Pronto",
            Self::Advance(OrderStatus::Entregue) => "Marcar como Entregue",
            Self::Advance(_) => "Avançar",
            Self::Cancel => "Cancelar",
        }
    }

    const fn icon(&self) -> &'static str {
        match self {
            Self::Advance(OrderStatus::Preparando) => "👨‍🍳",
            Self::Advance(OrderStatus::Pronto) => "✅",
            Self::Advance(OrderStatus::Entregue) => "🚚",
            Self::Advance(_) => "➡️",
            Self::Cancel => "❌",
        }
    }

    const fn css_class(&self) -> &'static str {
        match self {
            Self::Advance(OrderStatus::Preparando) => "btn-preparar",
            Self::Advance(OrderStatus::Pronto) => "btn-pronto",
            Self::Advance(OrderStatus::Entregue) => "btn-entregar",
            Self::Advance(_) => "btn-avancar",
            Self::Cancel => "btn-cancelar",
        }
    }
}

/// Actions offered for an order in `status`.
///
/// Derived from the rendered status only; the backend decides whether the
/// transition is legal.
#[must_use]
pub fn available_actions(status: OrderStatus) -> Vec<OrderAction> {
    let mut actions: Vec<OrderAction> =
        status.next().map(OrderAction::Advance).into_iter().collect();
    if status.is_cancellable() {
        actions.push(OrderAction::Cancel);
    }
    actions
}

/// Button for an order action.
#[derive(Debug, Clone)]
pub struct ActionButtonView {
    pub action: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub css_class: &'static str,
    /// Target status for advance actions, empty otherwise.
    pub target_status: &'static str,
}

impl From<OrderAction> for ActionButtonView {
    fn from(action: OrderAction) -> Self {
        Self {
            action: action.kind(),
            label: action.label(),
            icon: action.icon(),
            css_class: action.css_class(),
            target_status: match action {
                OrderAction::Advance(status) => status.as_str(),
                OrderAction::Cancel => "",
            },
        }
    }
}

// =============================================================================
// Active orders
// =============================================================================

/// One order line with its subtotal.
#[derive(Debug, Clone)]
pub struct ItemLineView {
    pub nome: String,
    /// `(xN)` when more than one unit, empty otherwise.
    pub quantity_suffix: String,
    pub subtotal: String,
}

impl From<&OrderItem> for ItemLineView {
    fn from(item: &OrderItem) -> Self {
        let quantity = item.effective_quantity();
        Self {
            nome: item.nome.clone(),
            quantity_suffix: if quantity > 1 {
                format!("(x{quantity})")
            } else {
                String::new()
            },
            subtotal: item.subtotal().display(),
        }
    }
}

/// Order card on the dashboard.
#[derive(Debug, Clone)]
pub struct OrderCardView {
    pub id: i64,
    pub status: &'static str,
    pub status_class: String,
    pub placed_at: String,
    pub items: Vec<ItemLineView>,
    pub total: String,
    pub actions: Vec<ActionButtonView>,
}

impl From<&Order> for OrderCardView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            status: order.status.as_str(),
            status_class: order.status.css_class(),
            placed_at: format_timestamp(order.data_pedido.as_deref()),
            items: order.itens.iter().map(ItemLineView::from).collect(),
            total: order.total.display(),
            actions: available_actions(order.status)
                .into_iter()
                .map(ActionButtonView::from)
                .collect(),
        }
    }
}

/// Active orders list.
#[derive(Debug, Template)]
#[template(path = "orders/list.html")]
pub struct OrderListView {
    pub orders: Vec<OrderCardView>,
}

impl OrderListView {
    #[must_use]
    pub fn new(orders: &[Order]) -> Self {
        Self {
            orders: orders.iter().map(OrderCardView::from).collect(),
        }
    }

    /// Render the list fragment.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}

/// Counters shown above the orders list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub revenue: Price,
}

impl OrderStats {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            total: orders.len(),
            pending: orders
                .iter()
                .filter(|order| order.status == OrderStatus::Pendente)
                .count(),
            revenue: orders.iter().map(|order| order.total).sum(),
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// Delivered order in the history panel.
#[derive(Debug, Clone)]
pub struct HistoryEntryView {
    pub number: i64,
    pub placed_at: String,
    pub delivered_at: String,
    pub items: Vec<ItemLineView>,
    pub total: String,
}

impl From<&HistoryEntry> for HistoryEntryView {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            number: entry.display_number(),
            placed_at: format_timestamp(entry.data_pedido.as_deref()),
            delivered_at: format_timestamp(entry.data_entrega.as_deref()),
            items: entry.itens.iter().map(ItemLineView::from).collect(),
            total: entry.total.display(),
        }
    }
}

/// History panel: the first `limit` entries of the backend's list, which is
/// ordered most recent delivery first.
#[derive(Debug, Template)]
#[template(path = "orders/history.html")]
pub struct HistoryListView {
    pub entries: Vec<HistoryEntryView>,
}

impl HistoryListView {
    #[must_use]
    pub fn new(history: &[HistoryEntry], limit: usize) -> Self {
        Self {
            entries: history
                .iter()
                .take(limit)
                .map(HistoryEntryView::from)
                .collect(),
        }
    }

    /// Render the history fragment.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}

#[cfg(test)]
mod tests {
    use comanda_core::{HistoryEntryId, OrderId};

    use super::*;

    fn order(id: i64, status: OrderStatus, json_items: &str, total: f64) -> Order {
        let json = format!(
            r#"{{"id": {id}, "status": "{status}", "data_pedido": "2024-05-01 12:30:00", "itens": {json_items}, "total": {total}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn history(count: i64) -> Vec<HistoryEntry> {
        (1..=count)
            .map(|n| HistoryEntry {
                id: HistoryEntryId::new(n),
                pedido_id: Some(OrderId::new(100 + n)),
                status: OrderStatus::Entregue,
                data_pedido: None,
                data_entrega: Some("2024-05-01 13:00:00".to_string()),
                itens: vec![],
                total: Price::from_cents(1000),
            })
            .collect()
    }

    #[test]
    fn test_actions_per_status() {
        assert_eq!(
            available_actions(OrderStatus::Pendente),
            vec![OrderAction::Advance(OrderStatus::Preparando), OrderAction::Cancel]
        );
        assert_eq!(
            available_actions(OrderStatus::Preparando),
            vec![OrderAction::Advance(OrderStatus::Pronto)]
        );
        assert_eq!(
            available_actions(OrderStatus::Pronto),
            vec![OrderAction::Advance(OrderStatus::Entregue)]
        );
        assert!(available_actions(OrderStatus::Entregue).is_empty());
        assert!(available_actions(OrderStatus::Cancelado).is_empty());
        assert!(available_actions(OrderStatus::Unknown).is_empty());
    }

    #[test]
    fn test_pending_order_renders_prepare_and_cancel_only() {
        let html = OrderListView::new(&[order(1, OrderStatus::Pendente, "[]", 0.0)])
            .to_html()
            .unwrap();
        assert_eq!(html.matches("data-action=").count(), 2);
        assert!(html.contains("Preparar"));
        assert!(html.contains("Cancelar"));
        assert!(html.contains(r#"data-status="Preparando""#));
        assert!(!html.contains("Marcar como"));
    }

    #[test]
    fn test_delivered_order_renders_no_actions() {
        let html = OrderListView::new(&[order(2, OrderStatus::Entregue, "[]", 0.0)])
            .to_html()
            .unwrap();
        assert_eq!(html.matches("data-action=").count(), 0);
        assert!(html.contains("status-entregue"));
    }

    #[test]
    fn test_item_subtotal_uses_quantity() {
        let items = r#"[{"nome": "X", "preco": 10, "quantidade": 3}]"#;
        let html = OrderListView::new(&[order(3, OrderStatus::Preparando, items, 30.0)])
            .to_html()
            .unwrap();
        assert!(html.contains("(x3)"));
        assert!(html.contains("R$ 30.00"));
        assert!(html.contains("01/05/2024 12:30"));
    }

    #[test]
    fn test_oversized_item_renders_without_overflow() {
        let items = r#"[{"nome": "X", "preco": "100000000000000000000", "quantidade": 4000000000}]"#;
        let html = OrderListView::new(&[order(5, OrderStatus::Pendente, items, 1.0)])
            .to_html()
            .unwrap();
        assert!(html.contains("(x4000000000)"));
    }

    #[test]
    fn test_order_without_status_renders_no_actions() {
        let order: Order = serde_json::from_str(r#"{"id":1,"itens":[],"total":1}"#).unwrap();
        let html = OrderListView::new(&[order]).to_html().unwrap();
        assert_eq!(html.matches("data-action=").count(), 0);
        assert!(html.contains("Desconhecido"));
    }

    #[test]
    fn test_empty_orders_placeholder() {
        let html = OrderListView::new(&[]).to_html().unwrap();
        assert!(html.contains("Nenhum pedido ativo"));
    }

    #[test]
    fn test_item_names_are_escaped() {
        let items = r#"[{"nome": "<script>alert(1)</script>", "preco": 1}]"#;
        let html = OrderListView::new(&[order(4, OrderStatus::Pronto, items, 1.0)])
            .to_html()
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_stats() {
        let orders = [
            order(1, OrderStatus::Pendente, "[]", 10.0),
            order(2, OrderStatus::Pendente, "[]", 5.5),
            order(3, OrderStatus::Pronto, "[]", 4.5),
        ];
        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.revenue.display(), "R$ 20.00");
    }

    #[test]
    fn test_stats_revenue_saturates() {
        let huge = "70000000000000000000000000000";
        let orders = [
            order(1, OrderStatus::Pendente, "[]", 1.0),
            serde_json::from_str(&format!(r#"{{"id":2,"itens":[],"total":"{huge}"}}"#)).unwrap(),
            serde_json::from_str(&format!(r#"{{"id":3,"itens":[],"total":"{huge}"}}"#)).unwrap(),
        ];
        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.revenue.amount(), rust_decimal::Decimal::MAX);
    }

    #[test]
    fn test_history_is_capped() {
        let entries = history(12);
        let view = HistoryListView::new(&entries, 10);
        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.entries[0].number, 101);
        assert_eq!(view.entries[0].placed_at, "Data não disponível");

        let html = view.to_html().unwrap();
        assert_eq!(html.matches("historico-item").count(), 10);
        assert!(!html.contains("Pedido #111"));
    }

    #[test]
    fn test_empty_history_placeholder() {
        let html = HistoryListView::new(&[], 10).to_html().unwrap();
        assert!(html.contains("Nenhum pedido entregue ainda"));
    }
}
