//! Order dashboard: active orders, delivery history and admin controls.
//!
//! All operations take `&self` so the dashboard can be shared with the
//! poller through an `Arc` while staff keep acting on it.

use std::sync::Arc;
use std::time::Duration;

use comanda_core::{OrderId, OrderStatus};
use tracing::{debug, info, instrument, warn};

use super::{Outcome, PageError, PageLoad, require_session};
use crate::api::{ApiClient, ApiMessage, Statistics};
use crate::poller::Poller;
use crate::screen::{Element, Notice, Route, Screen};
use crate::session::Session;
use crate::views::{HistoryListView, OrderAction, OrderListView, OrderStats, StatisticsView};

const CANCEL_PROMPT: &str =
    "⚠️ Tem certeza que deseja REMOVER este pedido?\n\nEsta ação não pode ser desfeita!";
const CLEAR_HISTORY_PROMPT: &str =
    "⚠️ Tem certeza que deseja LIMPAR TODO O HISTÓRICO?\n\nEsta ação não pode ser desfeita!";
const RESET_PROMPT: &str = "🔄 RESETAR SISTEMA?\n\n\
    ⚠️ ATENÇÃO: Esta ação irá:\n\n\
    1️⃣ Deletar TODOS os pedidos ativos\n\
    2️⃣ Limpar TODO o histórico\n\
    3️⃣ Deletar TODOS os produtos\n\n\
    ❌ ESTA AÇÃO NÃO PODE SER DESFEITA!\n\n\
    Deseja continuar?";
const LOGOUT_PROMPT: &str = "Deseja realmente sair?";

/// Actions raised from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    AdvanceStatus { order: OrderId, to: OrderStatus },
    CancelOrder(OrderId),
    ClearHistory,
    ResetSystem,
    Logout,
}

impl DashboardEvent {
    /// The event behind an order card button.
    #[must_use]
    pub const fn from_action(order: OrderId, action: OrderAction) -> Self {
        match action {
            OrderAction::Advance(to) => Self::AdvanceStatus { order, to },
            OrderAction::Cancel => Self::CancelOrder(order),
        }
    }
}

#[derive(Debug)]
pub struct OrdersDashboard<S> {
    api: ApiClient,
    screen: S,
    session: Session,
    history_limit: usize,
}

impl<S: Screen> OrdersDashboard<S> {
    /// Open the dashboard.
    ///
    /// Checks the session, shows the user's name and, for admins, the
    /// employee registration and reset controls, then renders orders and
    /// history once. Without a session nothing is fetched.
    pub async fn init(api: ApiClient, screen: S, history_limit: usize) -> PageLoad<Self> {
        let Some(session) = require_session(&api, &screen).await else {
            return PageLoad::Redirected(Route::Login);
        };

        screen.set_text(Element::UserName, session.usuario.clone());
        if session.is_admin() {
            screen.set_visible(Element::EmployeeRegistrationButton, true);
            screen.set_visible(Element::ResetButton, true);
        }

        let dashboard = Self {
            api,
            screen,
            session,
            history_limit,
        };
        dashboard.refresh().await;
        PageLoad::Ready(dashboard)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Reload both lists concurrently.
    pub async fn refresh(&self) -> Outcome {
        let (orders, history) = tokio::join!(self.load_orders(), self.load_history());
        match (orders, history) {
            (Outcome::Failed(e), _) | (_, Outcome::Failed(e)) => Outcome::Failed(e),
            _ => Outcome::Completed(()),
        }
    }

    /// Render active orders and the counters derived from them.
    ///
    /// A 401 means the session expired: the user is sent to the login page.
    #[instrument(skip(self))]
    pub async fn load_orders(&self) -> Outcome<usize> {
        let orders = match self.api.list_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                if e.is_unauthorized() {
                    info!("Session expired, redirecting to login");
                    self.screen.redirect(Route::Login, Duration::ZERO);
                } else {
                    warn!(error = %e, "Failed to load orders");
                }
                return Outcome::Failed(e.into());
            }
        };
        debug!(count = orders.len(), "Orders loaded");

        let html = match OrderListView::new(&orders).to_html() {
            Ok(html) => html,
            Err(e) => return Outcome::Failed(e.into()),
        };
        let stats = OrderStats::from_orders(&orders);

        self.screen
            .set_text(Element::ActiveCount, orders.len().to_string());
        self.screen.render(Element::OrdersList, html);
        self.screen
            .set_text(Element::TotalOrders, stats.total.to_string());
        self.screen
            .set_text(Element::PendingOrders, stats.pending.to_string());
        self.screen
            .set_text(Element::Revenue, stats.revenue.display());
        Outcome::Completed(orders.len())
    }

    /// Render the most recent deliveries. The counter shows the full count.
    #[instrument(skip(self))]
    pub async fn load_history(&self) -> Outcome<usize> {
        let history = match self.api.list_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Failed to load history");
                return Outcome::Failed(e.into());
            }
        };
        debug!(count = history.len(), "History loaded");

        let html = match HistoryListView::new(&history, self.history_limit).to_html() {
            Ok(html) => html,
            Err(e) => return Outcome::Failed(e.into()),
        };
        self.screen
            .set_text(Element::HistoryCount, history.len().to_string());
        self.screen.render(Element::HistoryList, html);
        Outcome::Completed(history.len())
    }

    /// Fetch and render the sales statistics panel.
    #[instrument(skip(self))]
    pub async fn load_statistics(&self) -> Outcome<Statistics> {
        let result = async {
            let stats = self.api.statistics().await?;
            self.screen
                .render(Element::Statistics, StatisticsView::from(&stats).to_html()?);
            Ok::<_, PageError>(stats)
        }
        .await;

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load statistics");
            self.screen
                .notify(Notice::error(e.user_message("Erro ao carregar estatísticas!")));
        }
        result.into()
    }

    /// Dispatch a dashboard event.
    pub async fn handle(&self, event: DashboardEvent) -> Outcome {
        match event {
            DashboardEvent::AdvanceStatus { order, to } => self.advance_status(order, to).await,
            DashboardEvent::CancelOrder(order) => self.cancel_order(order).await,
            DashboardEvent::ClearHistory => self.clear_history().await,
            DashboardEvent::ResetSystem => self.reset_system().await,
            DashboardEvent::Logout => self.logout().await,
        }
    }

    /// Move an order to `to`. The backend validates the transition.
    #[instrument(skip(self))]
    pub async fn advance_status(&self, order: OrderId, to: OrderStatus) -> Outcome {
        if let Err(e) = self.api.update_order_status(order, to).await {
            warn!(error = %e, "Failed to update order status");
            let e = PageError::from(e);
            self.screen
                .notify(Notice::error(e.user_message("Erro ao atualizar status!")));
            return Outcome::Failed(e);
        }

        info!("Order status updated");
        self.screen
            .notify(Notice::success(format!("Status atualizado para: {to}")));
        self.refresh().await
    }

    /// Remove an order permanently after confirmation.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order: OrderId) -> Outcome {
        if !self.screen.confirm(CANCEL_PROMPT) {
            return Outcome::Declined;
        }

        match self.api.delete_order(order).await {
            Ok(message) => {
                info!("Order removed");
                self.notify_backend_success(&message, "Pedido removido com sucesso!");
                self.load_orders().await.map(drop)
            }
            Err(e) => self.fail(e.into(), "Erro ao remover pedido!"),
        }
    }

    /// Delete the whole delivery history after confirmation.
    #[instrument(skip(self))]
    pub async fn clear_history(&self) -> Outcome {
        if !self.screen.confirm(CLEAR_HISTORY_PROMPT) {
            return Outcome::Declined;
        }

        match self.api.clear_history().await {
            Ok(message) => {
                info!("History cleared");
                self.notify_backend_success(&message, "Histórico limpo com sucesso!");
                self.load_history().await.map(drop)
            }
            Err(e) => self.fail(e.into(), "Erro ao limpar histórico!"),
        }
    }

    /// Wipe orders, history and products after confirmation.
    #[instrument(skip(self))]
    pub async fn reset_system(&self) -> Outcome {
        if !self.screen.confirm(RESET_PROMPT) {
            return Outcome::Declined;
        }

        match self.api.reset_system().await {
            Ok(message) => {
                info!("System reset");
                self.notify_backend_success(&message, "Sistema resetado com sucesso!");
                self.refresh().await
            }
            Err(e) => self.fail(e.into(), "Erro ao resetar sistema!"),
        }
    }

    /// End the session after confirmation and go to the landing page.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Outcome {
        if !self.screen.confirm(LOGOUT_PROMPT) {
            return Outcome::Declined;
        }

        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout failed");
            return Outcome::Failed(e.into());
        }

        info!(usuario = %self.session.usuario, "Logged out");
        self.screen.redirect(Route::Landing, Duration::ZERO);
        Outcome::Completed(())
    }

    fn notify_backend_success(&self, message: &ApiMessage, fallback: &str) {
        let text = message.mensagem.as_deref().unwrap_or(fallback);
        self.screen.notify(Notice::success(text));
    }

    fn fail(&self, e: PageError, fallback: &str) -> Outcome {
        warn!(error = %e, "Dashboard action failed");
        self.screen.notify(Notice::error(e.user_message(fallback)));
        Outcome::Failed(e)
    }
}

impl<S: Screen + 'static> OrdersDashboard<S> {
    /// Re-render orders and history every `period` until the returned
    /// poller is shut down.
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> Poller {
        let dashboard = Arc::clone(self);
        Poller::spawn(period, move || {
            let dashboard = Arc::clone(&dashboard);
            async move {
                dashboard.refresh().await;
            }
        })
    }
}
