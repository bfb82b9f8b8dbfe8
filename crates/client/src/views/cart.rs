//! Cart contents fragment.

use askama::Template;

use super::ViewError;
use crate::cart::Cart;

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub index: usize,
    pub nome: String,
    pub preco: String,
}

/// Items picked so far, each with a remove action keyed by position.
#[derive(Debug, Template)]
#[template(path = "cart.html")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Total without currency symbol, for the page's total field.
    pub total: String,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartLineView {
                    index,
                    nome: item.nome.clone(),
                    preco: item.preco.display(),
                })
                .collect(),
            total: cart.total().plain(),
        }
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}
