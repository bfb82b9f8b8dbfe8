//! Order dashboard commands.

use std::sync::Arc;

use comanda_client::pages::{DashboardEvent, OrdersDashboard};
use comanda_core::{OrderId, OrderStatus};

use super::{CommandError, Context, finish, ready};
use crate::screen::TerminalScreen;

async fn open(ctx: &Context) -> Result<OrdersDashboard<Arc<TerminalScreen>>, CommandError> {
    ctx.sign_in().await?;
    ready(
        OrdersDashboard::init(ctx.api.clone(), ctx.screen.clone(), ctx.config.history_limit)
            .await,
    )
}

async fn dispatch(ctx: &Context, event: DashboardEvent) -> Result<(), CommandError> {
    let dashboard = open(ctx).await?;
    finish(dashboard.handle(event).await)?;
    Ok(())
}

/// Render the dashboard and keep it fresh until Ctrl-C.
pub async fn live(ctx: &Context) -> Result<(), CommandError> {
    let dashboard = Arc::new(open(ctx).await?);
    let poller = dashboard.start_polling(ctx.config.poll_interval);
    tracing::info!(
        period_secs = ctx.config.poll_interval.as_secs(),
        "Dashboard running, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    poller.shutdown().await;
    Ok(())
}

pub async fn advance(ctx: &Context, order: OrderId, to: OrderStatus) -> Result<(), CommandError> {
    dispatch(ctx, DashboardEvent::AdvanceStatus { order, to }).await
}

pub async fn cancel(ctx: &Context, order: OrderId) -> Result<(), CommandError> {
    dispatch(ctx, DashboardEvent::CancelOrder(order)).await
}

pub async fn clear_history(ctx: &Context) -> Result<(), CommandError> {
    dispatch(ctx, DashboardEvent::ClearHistory).await
}

pub async fn reset(ctx: &Context) -> Result<(), CommandError> {
    dispatch(ctx, DashboardEvent::ResetSystem).await
}

pub async fn stats(ctx: &Context) -> Result<(), CommandError> {
    let dashboard = open(ctx).await?;
    finish(dashboard.load_statistics().await)?;
    Ok(())
}
