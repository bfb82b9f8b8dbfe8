//! Employee account management (admin only).

use comanda_client::pages::{EmployeeEvent, EmployeeForm, EmployeesPage};

use super::{CommandError, Context, finish, ready};

pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    ready(EmployeesPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    Ok(())
}

pub async fn add(ctx: &Context, form: EmployeeForm) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let page = ready(EmployeesPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    finish(page.handle(EmployeeEvent::Register(form)).await)?;
    Ok(())
}

pub async fn remove(ctx: &Context, usuario: String) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let page = ready(EmployeesPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    finish(page.handle(EmployeeEvent::Remove(usuario)).await)?;
    Ok(())
}
