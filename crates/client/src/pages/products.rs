//! Product registration and management pages.

use comanda_core::{Price, ProductId};
use tracing::{info, instrument, warn};

use super::{Outcome, PageError, PageLoad, require_session};
use crate::api::{ApiClient, Product, ProductInput};
use crate::screen::{Element, Notice, Route, Screen};
use crate::views::ManageProductsView;

/// Raw product form values as typed by staff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub nome: String,
    pub descricao: String,
    pub preco: String,
}

impl ProductForm {
    /// Check the form and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Invalid` when name or price is blank, or the
    /// price is not a non-negative number.
    pub fn validate(&self) -> Result<ProductInput, PageError> {
        let nome = self.nome.trim();
        if nome.is_empty() || self.preco.trim().is_empty() {
            return Err(PageError::Invalid("Preencha todos os campos!".to_string()));
        }

        let preco: Price = self
            .preco
            .parse()
            .map_err(|_| PageError::Invalid("Preço inválido!".to_string()))?;
        if preco.is_negative() {
            return Err(PageError::Invalid("Preço inválido!".to_string()));
        }

        Ok(ProductInput {
            nome: nome.to_string(),
            descricao: self.descricao.trim().to_string(),
            preco,
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            nome: product.nome.clone(),
            descricao: product.descricao.clone(),
            preco: product.preco.plain(),
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug)]
pub struct ProductRegistrationPage<S> {
    api: ApiClient,
    screen: S,
}

impl<S: Screen> ProductRegistrationPage<S> {
    /// Open the page. Requires a session.
    pub async fn init(api: ApiClient, screen: S) -> PageLoad<Self> {
        if require_session(&api, &screen).await.is_none() {
            return PageLoad::Redirected(Route::Login);
        }
        PageLoad::Ready(Self { api, screen })
    }

    /// Create a product from the form.
    #[instrument(skip(self, form), fields(nome = %form.nome))]
    pub async fn submit(&self, form: &ProductForm) -> Outcome<Product> {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => {
                self.screen.notify(Notice::error(e.user_message("")));
                return Outcome::Failed(e);
            }
        };

        match self.api.create_product(&input).await {
            Ok(product) => {
                info!(id = %product.id, "Product created");
                self.screen
                    .notify(Notice::success("Produto cadastrado com sucesso!"));
                self.screen.reset_form(Element::ProductForm);
                Outcome::Completed(product)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create product");
                let e = PageError::from(e);
                self.screen
                    .notify(Notice::error(e.user_message("Erro ao cadastrar produto!")));
                Outcome::Failed(e)
            }
        }
    }
}

// =============================================================================
// Management
// =============================================================================

/// Actions on the product management list and its edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductEvent {
    /// Open the editor pre-filled with the product.
    Edit(ProductId),
    /// Submit the editor.
    SaveEdit { id: ProductId, form: ProductForm },
    /// Close the editor without saving.
    CloseEditor,
    Delete(ProductId),
}

#[derive(Debug)]
pub struct ProductManagementPage<S> {
    api: ApiClient,
    screen: S,
    products: Vec<Product>,
}

impl<S: Screen> ProductManagementPage<S> {
    /// Open the page and render the product list. Requires a session.
    pub async fn init(api: ApiClient, screen: S) -> PageLoad<Self> {
        if require_session(&api, &screen).await.is_none() {
            return PageLoad::Redirected(Route::Login);
        }
        let mut page = Self {
            api,
            screen,
            products: Vec::new(),
        };
        // Load failures are logged and leave an empty list.
        page.refresh().await;
        PageLoad::Ready(page)
    }

    /// Products as last loaded.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Reload and render the list.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Outcome<usize> {
        let products = match self.api.list_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                return Outcome::Failed(e.into());
            }
        };

        match ManageProductsView::new(&products).to_html() {
            Ok(html) => self.screen.render(Element::ManageProducts, html),
            Err(e) => return Outcome::Failed(e.into()),
        }
        self.products = products;
        Outcome::Completed(self.products.len())
    }

    /// Dispatch a management event.
    pub async fn handle(&mut self, event: ProductEvent) -> Outcome {
        match event {
            ProductEvent::Edit(id) => self.open_editor(id),
            ProductEvent::SaveEdit { id, form } => self.save_edit(id, &form).await,
            ProductEvent::CloseEditor => {
                self.screen.set_visible(Element::EditModal, false);
                Outcome::Completed(())
            }
            ProductEvent::Delete(id) => self.delete(id).await,
        }
    }

    /// Fill the edit dialog with a loaded product and show it.
    pub fn open_editor(&self, id: ProductId) -> Outcome {
        let Some(product) = self.products.iter().find(|p| p.id == id) else {
            self.screen.notify(Notice::error("Produto não encontrado!"));
            return Outcome::Failed(PageError::NotLoaded(format!("produto {id}")));
        };

        let form = ProductForm::from(product);
        self.screen.fill_form(
            Element::EditForm,
            vec![
                ("edit-id", product.id.to_string()),
                ("edit-nome", form.nome),
                ("edit-descricao", form.descricao),
                ("edit-preco", form.preco),
            ],
        );
        self.screen.set_visible(Element::EditModal, true);
        Outcome::Completed(())
    }

    /// Replace a product's fields.
    #[instrument(skip(self, form))]
    pub async fn save_edit(&mut self, id: ProductId, form: &ProductForm) -> Outcome {
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => {
                self.screen.notify(Notice::error(e.user_message("")));
                return Outcome::Failed(e);
            }
        };

        if let Err(e) = self.api.update_product(id, &input).await {
            warn!(error = %e, "Failed to update product");
            let e = PageError::from(e);
            self.screen
                .notify(Notice::error(e.user_message("Erro ao atualizar produto!")));
            return Outcome::Failed(e);
        }

        info!("Product updated");
        self.screen
            .notify(Notice::success("Produto atualizado com sucesso!"));
        self.screen.set_visible(Element::EditModal, false);
        self.refresh().await.map(drop)
    }

    /// Delete a product after confirmation.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: ProductId) -> Outcome {
        if !self
            .screen
            .confirm("Tem certeza que deseja remover este produto?")
        {
            return Outcome::Declined;
        }

        if let Err(e) = self.api.delete_product(id).await {
            warn!(error = %e, "Failed to delete product");
            let e = PageError::from(e);
            self.screen
                .notify(Notice::error(e.user_message("Erro ao remover produto!")));
            return Outcome::Failed(e);
        }

        info!("Product deleted");
        self.screen.notify(Notice::success("Produto removido com sucesso!"));
        self.refresh().await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(nome: &str, descricao: &str, preco: &str) -> ProductForm {
        ProductForm {
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            preco: preco.to_string(),
        }
    }

    #[test]
    fn test_validate_builds_input() {
        let input = form(" Pastel ", "Queijo", "8,50").validate().unwrap();
        assert_eq!(input.nome, "Pastel");
        assert_eq!(input.preco, Price::from_cents(850));
    }

    #[test]
    fn test_validate_rejects_blank_and_bad_prices() {
        let err = form("", "x", "1").validate().unwrap_err();
        assert_eq!(err.user_message(""), "Preencha todos os campos!");

        let err = form("Pastel", "", "oito").validate().unwrap_err();
        assert_eq!(err.user_message(""), "Preço inválido!");

        let err = form("Pastel", "", "-1").validate().unwrap_err();
        assert_eq!(err.user_message(""), "Preço inválido!");
    }

    #[test]
    fn test_form_from_product() {
        let product = Product {
            id: ProductId::new(5),
            nome: "Suco".to_string(),
            descricao: "Laranja".to_string(),
            preco: Price::from_cents(700),
        };
        assert_eq!(ProductForm::from(&product), form("Suco", "Laranja", "7.00"));
    }
}
