// src/services/productos_stats_service.rs

use serde_json::Value;

use crate::{
    common::{error::{AppError, RemoteError}, normalize::extract_array},
    middleware::auth::AuthContext,
    models::productos::ProductosStats,
    remote::ApiClient,
};

const ENVELOPE_KEYS: &[&str] = &["data", "result"];

#[derive(Clone)]
pub struct ProductosStatsService {
    api: ApiClient,
}

impl ProductosStatsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Produtos são obrigatórios; variantes e imagens só enriquecem.
    pub async fn get_stats(&self, auth: &AuthContext) -> Result<ProductosStats, AppError> {
        let (productos, variantes, imagenes) = tokio::join!(
            self.api.get("/productos", &[], auth),
            self.api.get("/variantes", &[], auth),
            self.api.get("/imagenes", &[], auth),
        );

        let productos = extract_array(&productos?, ENVELOPE_KEYS);
        let variantes = optional_list("variantes", variantes);
        let imagenes = optional_list("imagenes", imagenes);

        Ok(ProductosStats::compute(&productos, &variantes, &imagenes))
    }
}

fn optional_list(recurso: &str, result: Result<Value, RemoteError>) -> Vec<Value> {
    match result {
        Ok(raw) => extract_array(&raw, ENVELOPE_KEYS),
        Err(err) => {
            tracing::warn!(recurso, error = %err, "listagem opcional indisponível; usando lista vazia");
            Vec::new()
        }
    }
}
