// src/handlers/variantes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        extract::AppJson,
    },
    models::variantes::{CamposVariante, CrearVariantePayload},
};

// POST /validator/variantes
#[utoipa::path(
    post,
    path = "/validator/variantes",
    tag = "Variantes",
    request_body = CrearVariantePayload,
    responses(
        (status = 200, description = "Variante criada na API oficial", body = serde_json::Value),
        (status = 400, description = "Dados inválidos ou produto ainda não salvo")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_variante(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppJson(payload): AppJson<CrearVariantePayload>,
) -> Result<impl IntoResponse, AppError> {
    let variante = app_state.variantes_service.crear(&auth, payload).await?;
    Ok((StatusCode::OK, Json(variante)))
}

// PUT /validator/variantes/{id}
#[utoipa::path(
    put,
    path = "/validator/variantes/{id}",
    tag = "Variantes",
    request_body = CamposVariante,
    params(("id" = i64, Path, description = "ID da variante")),
    responses(
        (status = 200, description = "Variante atualizada na API oficial", body = serde_json::Value),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_variante(
    State(app_state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    AppJson(campos): AppJson<CamposVariante>,
) -> Result<impl IntoResponse, AppError> {
    let variante = app_state
        .variantes_service
        .actualizar(&auth, &id, campos)
        .await?;
    Ok((StatusCode::OK, Json(variante)))
}
