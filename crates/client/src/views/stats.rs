//! Sales statistics panel.

use askama::Template;

use super::ViewError;
use crate::api::Statistics;

#[derive(Debug, Template)]
#[template(path = "stats.html")]
pub struct StatisticsView {
    pub total_orders: u64,
    pub total_revenue: String,
    pub average_ticket: String,
    pub orders_today: u64,
    pub revenue_today: String,
}

impl From<&Statistics> for StatisticsView {
    fn from(stats: &Statistics) -> Self {
        Self {
            total_orders: stats.total_pedidos,
            total_revenue: stats.receita_total.display(),
            average_ticket: stats.ticket_medio.display(),
            orders_today: stats.pedidos_hoje,
            revenue_today: stats.receita_hoje.display(),
        }
    }
}

impl StatisticsView {
    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}
