//! In-memory cart for the order-placement page.
//!
//! The cart is a plain owned value. Controllers borrow it mutably, so there
//! is exactly one writer at a time and no shared state to guard.

use comanda_core::{Price, ProductId};

use crate::api::{NewOrder, OrderItem, Product};

/// A product picked for the order being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: ProductId,
    pub nome: String,
    pub preco: Price,
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            nome: product.nome.clone(),
            preco: product.preco,
        }
    }
}

/// Items picked so far. Duplicates are separate lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item.
    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove the item at `index`. Out-of-range indices leave the cart untouched.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CartItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item prices, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.preco).sum()
    }

    /// Request body for placing this cart as an order.
    #[must_use]
    pub fn to_order(&self) -> NewOrder {
        NewOrder {
            itens: self
                .items
                .iter()
                .map(|item| OrderItem {
                    id: Some(item.id),
                    nome: item.nome.clone(),
                    preco: item.preco,
                    quantidade: None,
                })
                .collect(),
            total: self.total(),
        }
    }

    /// One `- nome: R$ x.xx` line per item, as listed in the finalize prompt.
    #[must_use]
    pub fn summary_lines(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("- {}: {}", item.nome, item.preco.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
