// src/handlers/productos.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthContext,
    models::productos::ProductosStats,
};

// GET /api/productos/estadisticas
#[utoipa::path(
    get,
    path = "/api/productos/estadisticas",
    tag = "Productos",
    responses(
        (status = 200, description = "Ativos, inativos, estoque crítico e categorias principais", body = ProductosStats),
        (status = 400, description = "Erro da API oficial ao listar produtos")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_productos_stats(
    State(app_state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.productos_stats_service.get_stats(&auth).await?;
    Ok((StatusCode::OK, Json(stats)))
}
