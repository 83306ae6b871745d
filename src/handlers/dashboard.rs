// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        extract::AppQuery,
    },
    models::dashboard::{DashboardSnapshot, MetricsQuery, YearMonth},
};

// GET /api/dashboard/metrics
#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "Dashboard",
    params(
        MetricsQuery,
        ("x-user-role" = Option<String>, Header, description = "Papel do usuário (`superadmin` usa as estatísticas do sistema)")
    ),
    responses(
        (status = 200, description = "Métricas do painel (erro no resumo vem em `error`, com métricas zeradas)", body = DashboardSnapshot),
        (status = 400, description = "Ano/mês inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_metrics(
    State(app_state): State<AppState>,
    auth: AuthContext,
    AppQuery(query): AppQuery<MetricsQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Sem parâmetros, o mês corrente (como o seletor do painel)
    let current = YearMonth::current();
    let year = query.year.unwrap_or(current.year());
    let month = query.month.unwrap_or(current.month());
    let target = YearMonth::new(year, month)
        .ok_or_else(|| AppError::BadRequest(format!("Mes inválido: {year}-{month}")))?;

    let board = app_state.metrics_boards.board_for(&auth);
    let snapshot = board
        .refresh(&app_state.dashboard_service, &auth, target)
        .await;
    app_state.metrics_boards.release(board);

    Ok((StatusCode::OK, Json(snapshot)))
}
