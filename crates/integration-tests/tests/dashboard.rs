//! Order dashboard against the fake backend.

use std::sync::Arc;
use std::time::Duration;

use comanda_client::pages::{DashboardEvent, OrdersDashboard};
use comanda_client::session::{SessionCheck, check_session};
use comanda_client::{ApiClient, Element, NoticeLevel, Route};
use comanda_core::{OrderId, OrderStatus};
use comanda_integration_tests::{FakeBackend, RecordingScreen, admin_client, manager_client};
use serde_json::json;

const HISTORY_LIMIT: usize = 10;

async fn open(client: ApiClient, screen: &RecordingScreen) -> OrdersDashboard<RecordingScreen> {
    OrdersDashboard::init(client, screen.clone(), HISTORY_LIMIT)
        .await
        .ready()
        .expect("Dashboard should load with a session")
}

fn burger_order(backend: &FakeBackend, status: &str) -> i64 {
    backend.seed_order(
        json!([{"id": 1, "nome": "X-Burger", "preco": 10.0, "quantidade": 3}]),
        30.0,
        status,
    )
}

#[tokio::test]
async fn test_init_renders_orders_and_counters() {
    let backend = FakeBackend::start().await;
    burger_order(&backend, "Pendente");
    backend.seed_order(json!([{"nome": "Suco", "preco": 6.5}]), 6.5, "Pronto");
    let screen = RecordingScreen::new();

    let dashboard = open(manager_client(&backend).await, &screen).await;

    assert_eq!(dashboard.session().usuario, "gerente");
    assert_eq!(screen.text(Element::UserName).as_deref(), Some("gerente"));
    assert_eq!(screen.text(Element::ActiveCount).as_deref(), Some("2"));
    assert_eq!(screen.text(Element::TotalOrders).as_deref(), Some("2"));
    assert_eq!(screen.text(Element::PendingOrders).as_deref(), Some("1"));
    assert_eq!(screen.text(Element::Revenue).as_deref(), Some("R$ 36.50"));

    let html = screen.rendered(Element::OrdersList).expect("Orders rendered");
    assert!(html.contains("Pedido #1"));
    assert!(html.contains("X-Burger (x3)"));
    assert!(html.contains("R$ 30.00"));
    assert!(html.contains("15/01/2026 12:30"));
    assert!(html.contains(r#"data-status="Preparando""#));
    assert!(html.contains(r#"data-status="Entregue""#));
    // Pendente gets advance + cancel, Pronto only advance.
    assert_eq!(html.matches("data-action=").count(), 3);
    assert_eq!(html.matches(r#"data-action="cancel""#).count(), 1);

    // Admin-only controls stay hidden for managers.
    assert_eq!(screen.visible(Element::EmployeeRegistrationButton), None);
    assert_eq!(screen.visible(Element::ResetButton), None);
}

#[tokio::test]
async fn test_admin_sees_admin_controls() {
    let backend = FakeBackend::start().await;
    let screen = RecordingScreen::new();

    let dashboard = open(admin_client(&backend).await, &screen).await;

    assert!(dashboard.session().is_admin());
    assert_eq!(screen.visible(Element::EmployeeRegistrationButton), Some(true));
    assert_eq!(screen.visible(Element::ResetButton), Some(true));
    let html = screen.rendered(Element::OrdersList).expect("Orders rendered");
    assert!(html.contains("Nenhum pedido ativo"));
}

#[tokio::test]
async fn test_history_shows_ten_most_recent_with_full_count() {
    let backend = FakeBackend::start().await;
    for i in 1..=12 {
        backend.seed_history(f64::from(i));
    }
    let screen = RecordingScreen::new();

    open(manager_client(&backend).await, &screen).await;

    assert_eq!(screen.text(Element::HistoryCount).as_deref(), Some("12"));
    let html = screen.rendered(Element::HistoryList).expect("History rendered");
    assert_eq!(html.matches(r#"class="historico-item""#).count(), 10);
    // Newest archived first: order 12 is shown, order 1 and 2 are not.
    assert!(html.contains("Pedido #12"));
    assert!(!html.contains("Pedido #2<"));
}

#[tokio::test]
async fn test_advance_status_refreshes_lists() {
    let backend = FakeBackend::start().await;
    let id = burger_order(&backend, "Pronto");
    let screen = RecordingScreen::new();
    let dashboard = open(manager_client(&backend).await, &screen).await;
    screen.clear();

    let outcome = dashboard
        .handle(DashboardEvent::AdvanceStatus {
            order: OrderId::new(id),
            to: OrderStatus::Entregue,
        })
        .await;

    assert!(outcome.is_completed());
    assert_eq!(
        screen.messages(NoticeLevel::Success),
        vec!["Status atualizado para: Entregue"]
    );
    assert_eq!(backend.order_status(id).as_deref(), Some("Entregue"));
    assert_eq!(screen.text(Element::ActiveCount).as_deref(), Some("0"));
    assert_eq!(screen.text(Element::HistoryCount).as_deref(), Some("1"));
    assert!(
        screen
            .rendered(Element::HistoryList)
            .is_some_and(|html| html.contains("Pedido #1"))
    );
}

#[tokio::test]
async fn test_advance_status_failure_keeps_lists() {
    let backend = FakeBackend::start().await;
    let id = burger_order(&backend, "Pendente");
    let screen = RecordingScreen::new();
    let dashboard = open(manager_client(&backend).await, &screen).await;
    backend.fail_with(
        "PUT",
        &format!("/api/pedidos/{id}/status"),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    );
    screen.clear();

    let outcome = dashboard
        .advance_status(OrderId::new(id), OrderStatus::Preparando)
        .await;

    assert!(outcome.is_failed());
    assert_eq!(screen.messages(NoticeLevel::Error), vec!["Falha simulada"]);
    assert_eq!(screen.render_count(Element::OrdersList), 0);
    assert_eq!(backend.order_status(id).as_deref(), Some("Pendente"));
}

#[tokio::test]
async fn test_cancel_declined_sends_nothing() {
    let backend = FakeBackend::start().await;
    let id = burger_order(&backend, "Pendente");
    let screen = RecordingScreen::new();
    let dashboard = open(admin_client(&backend).await, &screen).await;
    backend.clear_requests();
    screen.answer_next(false);

    let outcome = dashboard.cancel_order(OrderId::new(id)).await;

    assert!(outcome.is_declined());
    assert!(screen.confirms()[0].contains("REMOVER este pedido"));
    assert!(backend.requests().is_empty());
    assert_eq!(backend.order_count(), 1);
}

#[tokio::test]
async fn test_cancel_confirmed_removes_order() {
    let backend = FakeBackend::start().await;
    let id = burger_order(&backend, "Pendente");
    let screen = RecordingScreen::new();
    let dashboard = open(admin_client(&backend).await, &screen).await;

    let outcome = dashboard.handle(DashboardEvent::CancelOrder(OrderId::new(id))).await;

    assert!(outcome.is_completed());
    assert_eq!(backend.order_count(), 0);
    assert_eq!(
        screen.messages(NoticeLevel::Success),
        vec!["Pedido deletado com sucesso"]
    );
    assert_eq!(screen.text(Element::ActiveCount).as_deref(), Some("0"));
}

#[tokio::test]
async fn test_cancel_as_manager_shows_backend_refusal() {
    let backend = FakeBackend::start().await;
    let id = burger_order(&backend, "Pendente");
    let screen = RecordingScreen::new();
    let dashboard = open(manager_client(&backend).await, &screen).await;

    let outcome = dashboard.cancel_order(OrderId::new(id)).await;

    assert!(outcome.is_failed());
    assert_eq!(
        screen.messages(NoticeLevel::Error),
        vec!["Apenas administradores podem deletar pedidos"]
    );
    assert_eq!(backend.order_count(), 1);
}

#[tokio::test]
async fn test_clear_history_reports_removed_count() {
    let backend = FakeBackend::start().await;
    for total in [10.0, 20.0, 30.0] {
        backend.seed_history(total);
    }
    let screen = RecordingScreen::new();
    let dashboard = open(admin_client(&backend).await, &screen).await;

    let outcome = dashboard.handle(DashboardEvent::ClearHistory).await;

    assert!(outcome.is_completed());
    assert!(screen.confirms()[0].contains("LIMPAR TODO O HISTÓRICO"));
    assert_eq!(
        screen.messages(NoticeLevel::Success),
        vec!["3 registro(s) removido(s) do histórico"]
    );
    assert_eq!(backend.history_count(), 0);
    assert_eq!(screen.text(Element::HistoryCount).as_deref(), Some("0"));
}

#[tokio::test]
async fn test_reset_wipes_everything() {
    let backend = FakeBackend::start().await;
    burger_order(&backend, "Pendente");
    backend.seed_history(12.0);
    backend.seed_product("Café", "Expresso", 4.0);
    let screen = RecordingScreen::new();
    let dashboard = open(admin_client(&backend).await, &screen).await;

    let outcome = dashboard.handle(DashboardEvent::ResetSystem).await;

    assert!(outcome.is_completed());
    let prompt = &screen.confirms()[0];
    assert!(prompt.starts_with("🔄 RESETAR SISTEMA?"));
    assert!(prompt.contains("Deletar TODOS os produtos"));
    assert_eq!(
        screen.messages(NoticeLevel::Success),
        vec!["✅ Sistema resetado! Todos os pedidos, histórico e produtos foram deletados."]
    );
    assert_eq!(backend.order_count(), 0);
    assert_eq!(backend.history_count(), 0);
    assert_eq!(backend.product_count(), 0);
}

#[tokio::test]
async fn test_reset_declined_sends_nothing() {
    let backend = FakeBackend::start().await;
    burger_order(&backend, "Pendente");
    let screen = RecordingScreen::declining();
    let dashboard = open(admin_client(&backend).await, &screen).await;
    backend.clear_requests();

    assert!(dashboard.reset_system().await.is_declined());
    assert!(!backend.received("POST /api/resetar-ids"));
    assert_eq!(backend.order_count(), 1);
}

#[tokio::test]
async fn test_logout_returns_to_landing() {
    let backend = FakeBackend::start().await;
    let client = manager_client(&backend).await;
    let screen = RecordingScreen::new();
    let dashboard = open(client.clone(), &screen).await;

    let outcome = dashboard.handle(DashboardEvent::Logout).await;

    assert!(outcome.is_completed());
    assert_eq!(screen.confirms(), vec!["Deseja realmente sair?"]);
    assert_eq!(
        screen.redirects().last(),
        Some(&(Route::Landing, Duration::ZERO))
    );
    assert_eq!(check_session(&client).await, SessionCheck::Unauthenticated);
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let backend = FakeBackend::start().await;
    let screen = RecordingScreen::new();
    let dashboard = open(manager_client(&backend).await, &screen).await;
    backend.expire_sessions();
    screen.clear();

    let outcome = dashboard.load_orders().await;

    assert!(outcome.is_failed());
    assert_eq!(screen.redirects(), vec![(Route::Login, Duration::ZERO)]);
    assert_eq!(screen.render_count(Element::OrdersList), 0);
}

#[tokio::test]
async fn test_statistics_panel() {
    let backend = FakeBackend::start().await;
    backend.seed_history(10.0);
    backend.seed_history(30.0);
    let screen = RecordingScreen::new();
    let dashboard = open(manager_client(&backend).await, &screen).await;

    let stats = dashboard
        .load_statistics()
        .await
        .completed()
        .expect("Statistics should load");

    assert_eq!(stats.total_pedidos, 2);
    assert_eq!(stats.pedidos_hoje, 2);
    let html = screen.rendered(Element::Statistics).expect("Statistics rendered");
    assert!(html.contains("R$ 40.00"));
    assert!(html.contains("R$ 20.00"));
}

#[tokio::test]
async fn test_polling_picks_up_new_orders() {
    let backend = FakeBackend::start().await;
    let screen = RecordingScreen::new();
    let dashboard = Arc::new(open(manager_client(&backend).await, &screen).await);
    backend.clear_requests();

    let poller = dashboard.start_polling(Duration::from_millis(50));
    burger_order(&backend, "Pendente");
    tokio::time::sleep(Duration::from_millis(400)).await;
    poller.shutdown().await;

    assert!(backend.count("GET /api/pedidos") >= 3);
    assert!(backend.count("GET /api/pedidos/historico") >= 3);
    assert_eq!(screen.text(Element::ActiveCount).as_deref(), Some("1"));

    // No more ticks after shutdown.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = backend.count("GET /api/pedidos");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.count("GET /api/pedidos"), settled);
}
