mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use escritorio_backend::{
    middleware::auth::{AuthContext, Role},
    models::dashboard::{Metrics, YearMonth},
    remote::ApiClient,
    services::{
        dashboard_service::{
            DOMAIN_STATS_PATH, INVOICES_PATH, INVOICE_SEARCH_PATH, LOAD_ERROR_MESSAGE, ORDERS_PATH,
            PRODUCTS_PATH, REVENUE_MONTH_PATH, SYSTEM_STATS_PATH, USERS_PATH,
        },
        DashboardService, MetricsBoard,
    },
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> DashboardService {
    DashboardService::new(ApiClient::new(&server.uri()).unwrap())
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"error": "falló"})))
        .mount(server)
        .await;
}

fn items(n: usize) -> Vec<Value> {
    (0..n).map(|i| json!({ "id": i })).collect()
}

fn feb_2024() -> YearMonth {
    YearMonth::new(2024, 2).unwrap()
}

#[tokio::test]
async fn missing_summary_field_is_counted_from_listing() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        DOMAIN_STATS_PATH,
        json!({"total_usuarios": 5, "total_facturas": 8, "pedidos_pendientes": 2}),
    )
    .await;
    mount_json(&server, PRODUCTS_PATH, json!({ "data": items(17) })).await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"ingresos_mes": 300})).await;
    // Campos positivos no resumo não disparam fallback
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(1)))
        .expect(0)
        .mount(&server)
        .await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::bearer("tok", Role::Admin), feb_2024())
        .await
        .unwrap();

    assert_eq!(
        metrics,
        Metrics {
            total_users: 5,
            total_products: 17,
            total_invoices: 8,
            pending_orders: 2,
            monthly_revenue: 300.0,
        }
    );
}

#[tokio::test]
async fn failed_listing_keeps_prior_value_while_others_populate() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({})).await;
    mount_json(&server, USERS_PATH, json!(items(2))).await;
    mount_json(&server, PRODUCTS_PATH, json!({ "data": items(1) })).await;
    mount_json(&server, INVOICES_PATH, json!({ "result": items(3) })).await;
    mount_status(&server, ORDERS_PATH, 500).await;
    mount_status(&server, REVENUE_MONTH_PATH, 503).await;
    mount_json(&server, INVOICE_SEARCH_PATH, json!([{ "total": "10.5" }])).await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::anonymous(), feb_2024())
        .await
        .unwrap();

    assert_eq!(metrics.pending_orders, 0);
    assert_eq!(metrics.total_users, 2);
    assert_eq!(metrics.total_products, 1);
    assert_eq!(metrics.total_invoices, 3);
    assert_eq!(metrics.monthly_revenue, 10.5);
}

#[tokio::test]
async fn zero_revenue_falls_back_to_invoice_search_for_whole_month() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"data": {"total_usuarios": 1, "total_productos": 1, "total_facturas": 1, "pedidos_pendientes": 1}})).await;
    Mock::given(method("GET"))
        .and(path(REVENUE_MONTH_PATH))
        .and(query_param("year", "2024"))
        .and(query_param("month", "02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ingresos": 0})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(INVOICE_SEARCH_PATH))
        .and(query_param("fecha_inicio", "2024-02-01"))
        .and(query_param("fecha_fin", "2024-02-29"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "facturas": [
                { "total": "100.50" },
                { "detalle": { "monto": 49.5 } },
                { "cliente": "sin importe" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::anonymous(), feb_2024())
        .await
        .unwrap();

    assert_eq!(metrics.monthly_revenue, 150.0);
}

#[tokio::test]
async fn positive_dedicated_revenue_skips_invoice_search() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"total_usuarios": 1, "total_productos": 1, "total_facturas": 1, "pedidos_pendientes": 1, "ingresos_mes": 5})).await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"revenue": "1234.5"})).await;
    Mock::given(method("GET"))
        .and(path(INVOICE_SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::anonymous(), YearMonth::new(2023, 12).unwrap())
        .await
        .unwrap();

    assert_eq!(metrics.monthly_revenue, 1234.5);
}

#[tokio::test]
async fn failed_revenue_fallbacks_keep_summary_revenue() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"total_usuarios": 1, "total_productos": 1, "total_facturas": 1, "pedidos_pendientes": 1, "sales_month": "75.25"})).await;
    mount_status(&server, REVENUE_MONTH_PATH, 404).await;
    mount_status(&server, INVOICE_SEARCH_PATH, 500).await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::anonymous(), feb_2024())
        .await
        .unwrap();

    assert_eq!(metrics.monthly_revenue, 75.25);
}

#[tokio::test]
async fn identical_inputs_give_identical_metrics() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"total_usuarios": 3})).await;
    mount_json(&server, PRODUCTS_PATH, json!(items(4))).await;
    mount_json(&server, INVOICES_PATH, json!({"items": items(6)})).await;
    mount_json(&server, ORDERS_PATH, json!({"pedidos": items(2)})).await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"total": 900})).await;

    let service = service_for(&server);
    let auth = AuthContext::anonymous();
    let first = service.compute_metrics(&auth, feb_2024()).await.unwrap();
    let second = service.compute_metrics(&auth, feb_2024()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        (first.total_users, first.total_products, first.total_invoices, first.pending_orders),
        (3, 4, 6, 2)
    );
    assert_eq!(first.monthly_revenue, 900.0);
}

#[tokio::test]
async fn superadmin_reads_system_stats_with_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SYSTEM_STATS_PATH))
        .and(header("Authorization", "Bearer root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users_count": 10, "products_count": 20, "invoices_count": 30, "orders_pending": 4
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOMAIN_STATS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"ingresos": 1})).await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::bearer("root", Role::SuperAdmin), feb_2024())
        .await
        .unwrap();

    assert_eq!(metrics.total_users, 10);
    assert_eq!(metrics.pending_orders, 4);
}

#[tokio::test]
async fn rejected_summary_still_runs_every_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOMAIN_STATS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;
    for route in [USERS_PATH, PRODUCTS_PATH, INVOICES_PATH, ORDERS_PATH] {
        mount_json(&server, route, json!(items(2))).await;
    }
    mount_json(&server, REVENUE_MONTH_PATH, json!({"ingresos": 50})).await;

    let board = MetricsBoard::default();
    let snapshot = board
        .refresh(&service_for(&server), &AuthContext::anonymous(), feb_2024())
        .await;

    assert_eq!(snapshot.error, None);
    assert_eq!(
        snapshot.metrics,
        Metrics {
            total_users: 2,
            total_products: 2,
            total_invoices: 2,
            pending_orders: 2,
            monthly_revenue: 50.0,
        }
    );
}

#[tokio::test]
async fn unreachable_api_yields_zeroed_metrics_and_error() {
    // Porta sem ninguém escutando: falha de transporte
    let service = DashboardService::new(ApiClient::new("http://127.0.0.1:1").unwrap());

    let board = MetricsBoard::default();
    let snapshot = board
        .refresh(&service, &AuthContext::anonymous(), feb_2024())
        .await;

    assert_eq!(snapshot.metrics, Metrics::default());
    assert_eq!(snapshot.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(snapshot.month.as_deref(), Some("2024-02"));
    assert!(!snapshot.loading);
    assert_eq!(board.snapshot(), snapshot);
}

#[tokio::test]
async fn revenue_month_is_read_from_root_only() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"total_usuarios": 1, "total_productos": 1, "total_facturas": 1, "pedidos_pendientes": 1})).await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"data": {"ingresos_mes": 500}})).await;
    Mock::given(method("GET"))
        .and(path(INVOICE_SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"total": 42}])))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = service_for(&server)
        .compute_metrics(&AuthContext::anonymous(), feb_2024())
        .await
        .unwrap();

    assert_eq!(metrics.monthly_revenue, 42.0);
}

#[tokio::test]
async fn superseded_refresh_is_discarded() {
    let server = MockServer::start().await;
    mount_json(&server, DOMAIN_STATS_PATH, json!({"total_usuarios": 1, "total_productos": 1, "total_facturas": 1, "pedidos_pendientes": 1})).await;
    Mock::given(method("GET"))
        .and(path(REVENUE_MONTH_PATH))
        .and(query_param("month", "01"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ingresos": 100}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"ingresos": 200})).await;

    let board = MetricsBoard::default();
    let service = service_for(&server);

    let slow = {
        let board = board.clone();
        let service = service.clone();
        tokio::spawn(async move {
            board
                .refresh(&service, &AuthContext::anonymous(), YearMonth::new(2024, 1).unwrap())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;

    let fresh = board
        .refresh(&service, &AuthContext::anonymous(), feb_2024())
        .await;
    assert_eq!(fresh.generation, 2);
    assert_eq!(fresh.metrics.monthly_revenue, 200.0);
    assert_eq!(fresh.month.as_deref(), Some("2024-02"));
    assert!(!fresh.superseded);

    // O resultado atrasado de janeiro não sobrescreve fevereiro, e a
    // resposta de janeiro diz de qual mês são os números que carrega
    let stale = slow.await.unwrap();
    assert!(stale.superseded);
    assert_eq!(stale.generation, 2);
    assert_eq!(stale.month.as_deref(), Some("2024-02"));
    assert_eq!(stale.metrics.monthly_revenue, 200.0);

    let current = board.snapshot();
    assert_eq!(current.metrics.monthly_revenue, 200.0);
    assert!(!current.superseded);
}

#[tokio::test]
async fn metrics_route_serializes_dashboard_keys() {
    let server = MockServer::start().await;
    mount_json(&server, SYSTEM_STATS_PATH, json!({"data": {"total_usuarios": 7, "total_productos": 6, "total_facturas": 5, "pedidos_pendientes": 4}})).await;
    mount_json(&server, REVENUE_MONTH_PATH, json!({"ingresos_mes": 99.5})).await;

    let req = Request::builder()
        .uri("/api/dashboard/metrics?year=2024&month=2")
        .header("Authorization", "Bearer super")
        .header("x-user-role", "superadmin")
        .body(Body::empty())
        .unwrap();
    let (status, body) = common::send(common::router_for(&server), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics"]["total_usuarios"], 7);
    assert_eq!(body["metrics"]["pedidos_pendientes"], 4);
    assert_eq!(body["metrics"]["ingresos_mes"], 99.5);
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["loading"], false);
    assert_eq!(body["month"], "2024-02");
    assert_eq!(body["superseded"], false);
}

#[tokio::test]
async fn metrics_route_rejects_invalid_month() {
    let server = MockServer::start().await;
    let (status, body) = common::send(
        common::router_for(&server),
        common::get("/api/dashboard/metrics?year=2024&month=13"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2024-13"));
}

#[tokio::test]
async fn metrics_route_reports_malformed_query_as_json() {
    let server = MockServer::start().await;
    let (status, body) = common::send(
        common::router_for(&server),
        common::get("/api/dashboard/metrics?month=abc"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Parámetros inválidos"));
}

#[tokio::test]
async fn health_check() {
    let server = MockServer::start().await;
    let (status, _) = common::send(common::router_for(&server), common::get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
}
