//! Public menu and order placement.

use comanda_client::Cart;
use comanda_client::pages::{CartEvent, LandingPage, Section};
use comanda_core::ProductId;

use super::{CommandError, Context, finish};

/// Print the menu.
pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let mut page = LandingPage::new(ctx.api.clone(), ctx.screen.clone());
    finish(page.show_section(Section::Menu, &Cart::new()).await)?;
    Ok(())
}

/// Put the given products in a cart and place the order.
///
/// The backend only takes orders from a session, so this signs in first
/// when a user was given.
pub async fn place(ctx: &Context, products: &[ProductId]) -> Result<(), CommandError> {
    if ctx.usuario.is_some() {
        ctx.sign_in().await?;
    }

    let mut page = LandingPage::new(ctx.api.clone(), ctx.screen.clone());
    let mut cart = Cart::new();
    finish(page.show_section(Section::Order, &cart).await)?;

    for id in products {
        finish(page.handle(CartEvent::Add(*id), &mut cart).await)?;
    }
    finish(page.handle(CartEvent::Finalize, &mut cart).await)?;
    Ok(())
}
