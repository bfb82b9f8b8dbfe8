//! Product catalog management.

use comanda_client::pages::{
    ProductEvent, ProductForm, ProductManagementPage, ProductRegistrationPage,
};
use comanda_core::ProductId;

use super::{CommandError, Context, finish, ready};

/// Field overrides for `products edit`.
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<String>,
}

pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let page = ready(ProductManagementPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    tracing::info!(count = page.products().len(), "Products listed");
    Ok(())
}

pub async fn add(ctx: &Context, form: ProductForm) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let page = ready(ProductRegistrationPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    finish(page.submit(&form).await)?;
    Ok(())
}

/// Open the editor for `id`, apply `changes` over the current values and save.
pub async fn edit(ctx: &Context, id: ProductId, changes: ProductChanges) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let mut page = ready(ProductManagementPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    finish(page.handle(ProductEvent::Edit(id)).await)?;

    let Some(current) = page.products().iter().find(|p| p.id == id) else {
        return Ok(());
    };
    let mut form = ProductForm::from(current);
    if let Some(nome) = changes.nome {
        form.nome = nome;
    }
    if let Some(descricao) = changes.descricao {
        form.descricao = descricao;
    }
    if let Some(preco) = changes.preco {
        form.preco = preco;
    }

    finish(page.handle(ProductEvent::SaveEdit { id, form }).await)?;
    Ok(())
}

pub async fn delete(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    ctx.sign_in().await?;
    let mut page = ready(ProductManagementPage::init(ctx.api.clone(), ctx.screen.clone()).await)?;
    finish(page.handle(ProductEvent::Delete(id)).await)?;
    Ok(())
}
