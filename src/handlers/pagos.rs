// src/handlers/pagos.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        extract::{AppJson, AppQuery},
    },
    models::pagos::{ConsultaPagosQuery, CrearPagoPayload, PaginaPagos, PaginacionQuery},
};

// POST /validator/pagos
#[utoipa::path(
    post,
    path = "/validator/pagos",
    tag = "Pagos",
    request_body = CrearPagoPayload,
    responses(
        (status = 200, description = "Pagamento criado na API oficial (resposta repassada)", body = serde_json::Value),
        (status = 400, description = "Dados inválidos, pedido inexistente ou erro da API oficial")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_pago(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppJson(payload): AppJson<CrearPagoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pago = app_state.pagos_service.crear(&auth, payload).await?;
    Ok((StatusCode::OK, Json(pago)))
}

// GET /pagos/consulta
#[utoipa::path(
    get,
    path = "/pagos/consulta",
    tag = "Pagos",
    params(ConsultaPagosQuery),
    responses(
        (status = 200, description = "Resultado da consulta na API oficial", body = serde_json::Value),
        (status = 400, description = "Filtros inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn consulta_pagos(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppQuery(query): AppQuery<ConsultaPagosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = app_state.pagos_service.consulta(&auth, query).await?;
    Ok((StatusCode::OK, Json(resultado)))
}

// GET /pagos/admin
#[utoipa::path(
    get,
    path = "/pagos/admin",
    tag = "Pagos",
    params(PaginacionQuery),
    responses(
        (status = 200, description = "Pagamentos mais recentes primeiro", body = PaginaPagos),
        (status = 400, description = "Paginação inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_pagos_admin(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppQuery(query): AppQuery<PaginacionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state.pagos_service.admin_list(&auth, query).await?;
    Ok((StatusCode::OK, Json(pagina)))
}

// POST /pagos/simular-aprobacion
#[utoipa::path(
    post,
    path = "/pagos/simular-aprobacion",
    tag = "Pagos",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Pagamento criado e marcado como aprovado (simulação)", body = serde_json::Value),
        (status = 400, description = "Erro da API oficial")
    ),
    security(("api_jwt" = []))
)]
pub async fn simular_aprobacion(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppJson(body): AppJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let simulado = app_state.pagos_service.simular_aprobacion(&auth, body).await?;
    Ok((StatusCode::OK, Json(simulado)))
}
