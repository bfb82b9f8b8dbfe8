//! Product fragments: public menu, order picker and management list.

use askama::Template;

use super::ViewError;
use crate::api::Product;

/// A product as shown on any of the product lists.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub nome: String,
    pub descricao: String,
    pub preco: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            nome: product.nome.clone(),
            descricao: product.descricao.clone(),
            preco: product.preco.display(),
        }
    }
}

fn cards(products: &[Product]) -> Vec<ProductCardView> {
    products.iter().map(ProductCardView::from).collect()
}

/// Read-only menu.
#[derive(Debug, Template)]
#[template(path = "products/catalog.html")]
pub struct CatalogView {
    pub products: Vec<ProductCardView>,
}

impl CatalogView {
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            products: cards(products),
        }
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}

/// Products with an "add to order" action.
#[derive(Debug, Template)]
#[template(path = "products/picker.html")]
pub struct ProductPickerView {
    pub products: Vec<ProductCardView>,
}

impl ProductPickerView {
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            products: cards(products),
        }
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}

/// Products with edit and remove actions.
#[derive(Debug, Template)]
#[template(path = "products/manage.html")]
pub struct ManageProductsView {
    pub products: Vec<ProductCardView>,
}

impl ManageProductsView {
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            products: cards(products),
        }
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}
