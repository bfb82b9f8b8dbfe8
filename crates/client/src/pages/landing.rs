//! Public landing page: menu browsing and order placement.
//!
//! No session is required. The cart belongs to the caller and is passed in
//! by `&mut` for every mutation.

use comanda_core::ProductId;
use tracing::{debug, info, instrument, warn};

use super::{Outcome, PageError};
use crate::api::{ApiClient, CreatedOrder, Product};
use crate::cart::{Cart, CartItem};
use crate::screen::{Element, Notice, Screen};
use crate::views::{CartView, CatalogView, ProductPickerView};

/// Sections reachable from the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Menu,
    Order,
}

impl Section {
    const fn element(self) -> Element {
        match self {
            Self::Menu => Element::MenuSection,
            Self::Order => Element::OrderSection,
        }
    }
}

/// Actions on the order-placement section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Add(ProductId),
    Remove(usize),
    Clear,
    Finalize,
}

#[derive(Debug)]
pub struct LandingPage<S> {
    api: ApiClient,
    screen: S,
    /// Products shown by the picker, used to resolve `CartEvent::Add`.
    products: Vec<Product>,
}

impl<S: Screen> LandingPage<S> {
    pub const fn new(api: ApiClient, screen: S) -> Self {
        Self {
            api,
            screen,
            products: Vec::new(),
        }
    }

    /// Hide the lobby, open `section` and load its data.
    pub async fn show_section(&mut self, section: Section, cart: &Cart) -> Outcome<usize> {
        self.screen.set_visible(Element::Lobby, false);
        for other in [Section::Menu, Section::Order] {
            self.screen.set_visible(other.element(), other == section);
        }

        match section {
            Section::Menu => self.load_catalog().await,
            Section::Order => self.load_picker(cart).await,
        }
    }

    /// Close any open section and show the lobby again.
    pub fn back_to_lobby(&self) {
        self.screen.set_visible(Element::MenuSection, false);
        self.screen.set_visible(Element::OrderSection, false);
        self.screen.set_visible(Element::Lobby, true);
    }

    /// Render the read-only menu.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Outcome<usize> {
        let result = async {
            let products = self.api.list_products().await?;
            self.screen
                .render(Element::Catalog, CatalogView::new(&products).to_html()?);
            Ok::<_, PageError>(products.len())
        }
        .await;

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load menu");
        }
        result.into()
    }

    /// Render the product picker and the current cart.
    #[instrument(skip(self, cart))]
    pub async fn load_picker(&mut self, cart: &Cart) -> Outcome<usize> {
        let products = match self.api.list_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Failed to load products for ordering");
                return Outcome::Failed(e.into());
            }
        };
        debug!(count = products.len(), "Products loaded");

        let result = ProductPickerView::new(&products)
            .to_html()
            .map_err(PageError::from)
            .and_then(|html| {
                self.screen.render(Element::OrderProducts, html);
                self.render_cart(cart)
            });
        self.products = products;
        result.map(|()| self.products.len()).into()
    }

    /// Dispatch a cart event.
    pub async fn handle(&self, event: CartEvent, cart: &mut Cart) -> Outcome {
        match event {
            CartEvent::Add(id) => self.add(id, cart),
            CartEvent::Remove(index) => self.remove(index, cart),
            CartEvent::Clear => self.clear(cart),
            CartEvent::Finalize => self.finalize(cart).await.map(drop),
        }
    }

    /// Add a loaded product to the cart.
    pub fn add(&self, id: ProductId, cart: &mut Cart) -> Outcome {
        let Some(product) = self.products.iter().find(|p| p.id == id) else {
            self.screen.notify(Notice::error("Produto não encontrado!"));
            return Outcome::Failed(PageError::NotLoaded(format!("produto {id}")));
        };

        cart.add(CartItem::from(product));
        if let Err(e) = self.render_cart(cart) {
            return Outcome::Failed(e);
        }
        self.screen
            .notify(Notice::success(format!("\"{}\" adicionado ao pedido!", product.nome)));
        Outcome::Completed(())
    }

    /// Remove the item at `index` after confirmation.
    pub fn remove(&self, index: usize, cart: &mut Cart) -> Outcome {
        let Some(item) = cart.get(index) else {
            return Outcome::Declined;
        };
        let prompt = format!(
            "⚠️ Remover item do pedido?\n\n\"{}\" - {}\n\nDeseja confirmar a remoção?",
            item.nome,
            item.preco.display()
        );
        if !self.screen.confirm(&prompt) {
            return Outcome::Declined;
        }

        let Some(removed) = cart.remove(index) else {
            return Outcome::Declined;
        };
        if let Err(e) = self.render_cart(cart) {
            return Outcome::Failed(e);
        }
        self.screen
            .notify(Notice::success(format!("\"{}\" removido do pedido!", removed.nome)));
        Outcome::Completed(())
    }

    /// Empty the cart after confirmation.
    pub fn clear(&self, cart: &mut Cart) -> Outcome {
        if cart.is_empty() {
            self.screen.notify(Notice::info("O pedido já está vazio!"));
            return Outcome::Declined;
        }
        if !self.screen.confirm("Deseja limpar todo o pedido?") {
            return Outcome::Declined;
        }

        cart.clear();
        if let Err(e) = self.render_cart(cart) {
            return Outcome::Failed(e);
        }
        self.screen.notify(Notice::info("🗑️ Pedido limpo!"));
        Outcome::Completed(())
    }

    /// Place the cart as an order.
    ///
    /// An empty cart is rejected locally without a request. The cart is
    /// emptied only when the backend accepts the order.
    #[instrument(skip(self, cart), fields(items = cart.len()))]
    pub async fn finalize(&self, cart: &mut Cart) -> Outcome<CreatedOrder> {
        if cart.is_empty() {
            self.screen.notify(Notice::info(
                "⚠️ Adicione itens ao pedido antes de finalizar!",
            ));
            return Outcome::Declined;
        }

        let order = cart.to_order();
        let prompt = format!(
            "Confirmar pedido?\n\n{}\n\nTotal: {}",
            cart.summary_lines(),
            order.total.display()
        );
        if !self.screen.confirm(&prompt) {
            return Outcome::Declined;
        }

        match self.api.create_order(&order).await {
            Ok(created) => {
                info!(total = %order.total, "Order placed");
                self.screen.notify(Notice::success(format!(
                    "Pedido finalizado com sucesso!\n\nTotal: {}\n\n📋 O pedido foi enviado para a área de gerenciamento.",
                    order.total.display()
                )));
                cart.clear();
                if let Err(e) = self.render_cart(cart) {
                    return Outcome::Failed(e);
                }
                Outcome::Completed(created)
            }
            Err(e) => {
                warn!(error = %e, "Failed to place order");
                let e = PageError::from(e);
                self.screen
                    .notify(Notice::error(e.user_message("Erro ao finalizar pedido!")));
                Outcome::Failed(e)
            }
        }
    }

    fn render_cart(&self, cart: &Cart) -> Result<(), PageError> {
        let view = CartView::new(cart);
        self.screen.render(Element::CartItems, view.to_html()?);
        self.screen.set_text(Element::CartTotal, view.total);
        Ok(())
    }
}
