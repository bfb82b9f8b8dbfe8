//! Landing page menu and order placement against the fake backend.

use comanda_client::pages::{CartEvent, LandingPage, Section};
use comanda_client::{Cart, Element, NoticeLevel};
use comanda_core::ProductId;
use comanda_integration_tests::{FakeBackend, RecordingScreen, manager_client};

struct Menu {
    burger: ProductId,
    suco: ProductId,
}

fn seed_menu(backend: &FakeBackend) -> Menu {
    Menu {
        burger: ProductId::new(backend.seed_product("X-Burger", "Pão, carne e queijo", 12.0)),
        suco: ProductId::new(backend.seed_product("Suco", "Laranja natural", 6.5)),
    }
}

#[tokio::test]
async fn test_menu_is_public() {
    let backend = FakeBackend::start().await;
    seed_menu(&backend);
    let screen = RecordingScreen::new();
    let mut page = LandingPage::new(backend.client(), screen.clone());

    let outcome = page.show_section(Section::Menu, &Cart::new()).await;

    assert_eq!(outcome.completed(), Some(2));
    assert_eq!(screen.visible(Element::Lobby), Some(false));
    assert_eq!(screen.visible(Element::MenuSection), Some(true));
    assert_eq!(screen.visible(Element::OrderSection), Some(false));
    let html = screen.rendered(Element::Catalog).expect("Menu rendered");
    assert!(html.contains("X-Burger"));
    assert!(html.contains("R$ 6.50"));
    assert!(!html.contains("data-action"));

    page.back_to_lobby();
    assert_eq!(screen.visible(Element::Lobby), Some(true));
    assert_eq!(screen.visible(Element::MenuSection), Some(false));
}

#[tokio::test]
async fn test_finalize_empty_cart_sends_nothing() {
    let backend = FakeBackend::start().await;
    let screen = RecordingScreen::new();
    let page = LandingPage::new(manager_client(&backend).await, screen.clone());
    let mut cart = Cart::new();
    backend.clear_requests();

    let outcome = page.finalize(&mut cart).await;

    assert!(outcome.is_declined());
    assert_eq!(
        screen.messages(NoticeLevel::Info),
        vec!["⚠️ Adicione itens ao pedido antes de finalizar!"]
    );
    assert!(screen.confirms().is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_add_and_finalize_places_order() {
    let backend = FakeBackend::start().await;
    let menu = seed_menu(&backend);
    let screen = RecordingScreen::new();
    let mut page = LandingPage::new(manager_client(&backend).await, screen.clone());
    let mut cart = Cart::new();

    page.show_section(Section::Order, &cart).await;
    let picker = screen.rendered(Element::OrderProducts).expect("Picker rendered");
    assert_eq!(picker.matches(r#"data-action="add-to-cart""#).count(), 2);

    for id in [menu.burger, menu.suco] {
        assert!(page.handle(CartEvent::Add(id), &mut cart).await.is_completed());
    }
    assert_eq!(screen.text(Element::CartTotal).as_deref(), Some("18.50"));
    assert!(
        screen
            .messages(NoticeLevel::Success)
            .contains(&"\"Suco\" adicionado ao pedido!".to_string())
    );

    let created = page
        .finalize(&mut cart)
        .await
        .completed()
        .expect("Order should be placed");

    let prompt = screen.confirms().pop().expect("Finalize asks first");
    assert!(prompt.contains("- X-Burger: R$ 12.00\n- Suco: R$ 6.50"));
    assert!(prompt.ends_with("Total: R$ 18.50"));
    assert_eq!(created.pedido.map(|p| p.itens.len()), Some(2));

    let stored = backend.last_order().expect("Order stored");
    assert_eq!(stored["total"], 18.5);
    assert_eq!(stored["status"], "Pendente");
    assert_eq!(stored["itens"][0]["nome"], "X-Burger");

    assert!(cart.is_empty());
    assert_eq!(screen.text(Element::CartTotal).as_deref(), Some("0.00"));
    assert!(
        screen
            .rendered(Element::CartItems)
            .is_some_and(|html| html.contains("Nenhum item selecionado."))
    );
}

#[tokio::test]
async fn test_finalize_declined_keeps_cart() {
    let backend = FakeBackend::start().await;
    let menu = seed_menu(&backend);
    let screen = RecordingScreen::declining();
    let mut page = LandingPage::new(manager_client(&backend).await, screen.clone());
    let mut cart = Cart::new();
    page.load_picker(&cart).await;
    page.add(menu.burger, &mut cart);

    assert!(page.handle(CartEvent::Finalize, &mut cart).await.is_declined());
    assert_eq!(cart.len(), 1);
    assert!(!backend.received("POST /api/pedidos"));
}

#[tokio::test]
async fn test_finalize_failure_keeps_cart() {
    let backend = FakeBackend::start().await;
    let menu = seed_menu(&backend);
    let screen = RecordingScreen::new();
    let mut page = LandingPage::new(manager_client(&backend).await, screen.clone());
    let mut cart = Cart::new();
    page.load_picker(&cart).await;
    page.add(menu.suco, &mut cart);
    backend.fail_with(
        "POST",
        "/api/pedidos",
        reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    );

    let outcome = page.finalize(&mut cart).await;

    assert!(outcome.is_failed());
    assert_eq!(cart.len(), 1);
    assert_eq!(screen.messages(NoticeLevel::Error), vec!["Falha simulada"]);
    assert_eq!(backend.order_count(), 0);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let backend = FakeBackend::start().await;
    let menu = seed_menu(&backend);
    let screen = RecordingScreen::new();
    let mut page = LandingPage::new(backend.client(), screen.clone());
    let mut cart = Cart::new();
    page.load_picker(&cart).await;
    page.add(menu.burger, &mut cart);
    page.add(menu.suco, &mut cart);

    // Out of range: nothing asked, nothing removed.
    assert!(page.handle(CartEvent::Remove(5), &mut cart).await.is_declined());
    assert!(screen.confirms().is_empty());
    assert_eq!(cart.len(), 2);

    assert!(page.handle(CartEvent::Remove(0), &mut cart).await.is_completed());
    assert!(screen.confirms()[0].contains("\"X-Burger\" - R$ 12.00"));
    assert_eq!(cart.items()[0].nome, "Suco");
    assert_eq!(screen.text(Element::CartTotal).as_deref(), Some("6.50"));

    assert!(page.handle(CartEvent::Clear, &mut cart).await.is_completed());
    assert!(cart.is_empty());
    assert!(page.handle(CartEvent::Clear, &mut cart).await.is_declined());
    assert_eq!(
        screen.messages(NoticeLevel::Info),
        vec!["🗑️ Pedido limpo!", "O pedido já está vazio!"]
    );
}

#[tokio::test]
async fn test_add_unknown_product() {
    let backend = FakeBackend::start().await;
    seed_menu(&backend);
    let screen = RecordingScreen::new();
    let mut page = LandingPage::new(backend.client(), screen.clone());
    let mut cart = Cart::new();
    page.load_picker(&cart).await;

    let outcome = page.add(ProductId::new(99), &mut cart);

    assert!(outcome.is_failed());
    assert!(cart.is_empty());
    assert_eq!(
        screen.messages(NoticeLevel::Error),
        vec!["Produto não encontrado!"]
    );
}
