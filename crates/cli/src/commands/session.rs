//! Login and logout.

use comanda_client::pages::{DashboardEvent, LoginPage, OrdersDashboard};
use comanda_client::config::required_var;
use secrecy::SecretString;

use super::{CommandError, Context, finish, ready};

/// Sign in as `usuario`, reading the password from `COMANDA_SENHA`.
pub async fn login(ctx: &Context, usuario: &str) -> Result<(), CommandError> {
    let senha = SecretString::from(required_var("COMANDA_SENHA")?);
    let page = LoginPage::new(ctx.api.clone(), ctx.screen.clone());
    finish(page.submit(usuario, senha).await)?;
    Ok(())
}

/// Sign in, then end the session the way the dashboard does.
pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let dashboard = ready(
        OrdersDashboard::init(ctx.api.clone(), ctx.screen.clone(), ctx.config.history_limit)
            .await,
    )?;
    finish(dashboard.handle(DashboardEvent::Logout).await)?;
    Ok(())
}
