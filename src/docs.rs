// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_metrics,

        // --- Pagos ---
        handlers::pagos::crear_pago,
        handlers::pagos::consulta_pagos,
        handlers::pagos::listar_pagos_admin,
        handlers::pagos::simular_aprobacion,

        // --- Variantes ---
        handlers::variantes::crear_variante,
        handlers::variantes::actualizar_variante,

        // --- Productos ---
        handlers::productos::get_productos_stats,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::Metrics,
            models::dashboard::DashboardSnapshot,

            // --- PAGOS ---
            models::pagos::CrearPagoPayload,
            models::pagos::PaginaPagos,

            // --- VARIANTES ---
            models::variantes::CrearVariantePayload,
            models::variantes::CamposVariante,

            // --- PRODUCTOS ---
            models::productos::ProductosStats,
            models::productos::CategoriaTop,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores do painel, agregados da API oficial"),
        (name = "Pagos", description = "Validação e consulta de pagamentos"),
        (name = "Variantes", description = "Validação de variantes de produto"),
        (name = "Productos", description = "Estatísticas do módulo de produtos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/dashboard/metrics",
            "/validator/pagos",
            "/pagos/consulta",
            "/pagos/admin",
            "/pagos/simular-aprobacion",
            "/validator/variantes",
            "/validator/variantes/{id}",
            "/api/productos/estadisticas",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota sem doc: {path}");
        }
    }
}
