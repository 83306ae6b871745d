//src/lib.rs

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod remote;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

/// Monta o router completo com o estado já resolvido.
pub fn app(app_state: AppState) -> Router {
    // Validador local: checa o payload antes de repassar à API oficial
    let validator_routes = Router::new()
        .route("/pagos", post(handlers::pagos::crear_pago))
        .route("/variantes", post(handlers::variantes::crear_variante))
        .route("/variantes/{id}", put(handlers::variantes::actualizar_variante));

    let pagos_routes = Router::new()
        .route("/consulta", get(handlers::pagos::consulta_pagos))
        .route("/admin", get(handlers::pagos::listar_pagos_admin))
        .route("/simular-aprobacion", post(handlers::pagos::simular_aprobacion));

    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/dashboard/metrics", get(handlers::dashboard::get_metrics))
        .route("/productos/estadisticas", get(handlers::productos::get_productos_stats));

    let cors = cors_layer(app_state.config.cors_allow_origin.as_deref());

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .nest("/validator", validator_routes)
        .nest("/pagos", pagos_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.map(HeaderValue::from_str) {
        None => CorsLayer::permissive(),
        Some(Ok(origin)) => CorsLayer::permissive().allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("CORS_ALLOW_ORIGIN inválido; liberando qualquer origem");
            CorsLayer::permissive()
        }
    }
}
