// src/services/variantes_service.rs

use serde_json::Value;

use crate::{
    common::{
        error::AppError,
        normalize::{is_present, unwrap_data},
        validation::positive_id,
    },
    middleware::auth::AuthContext,
    models::variantes::{CamposVariante, CrearVariantePayload},
    remote::ApiClient,
};

const PRODUCTO_NO_GUARDADO: &str = "Debes guardar el producto antes de agregar variantes";

#[derive(Clone)]
pub struct VariantesService {
    api: ApiClient,
}

impl VariantesService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn crear(&self, auth: &AuthContext, payload: CrearVariantePayload) -> Result<Value, AppError> {
        let variante = payload.into_validated()?;
        let id_producto = variante.id_producto.unwrap_or_default();

        // Variante só depois do produto salvo
        let producto = self
            .api
            .get(&format!("/productos/{id_producto}"), &[], auth)
            .await;
        let existe = matches!(&producto, Ok(raw) if is_present(unwrap_data(raw)));
        if !existe {
            if let Err(err) = producto {
                tracing::debug!(id_producto, error = %err, "produto não encontrado");
            }
            return Err(AppError::BadRequest(PRODUCTO_NO_GUARDADO.into()));
        }

        Ok(self.api.post("/variantes", &variante, auth).await?)
    }

    pub async fn actualizar(
        &self,
        auth: &AuthContext,
        id: &str,
        campos: CamposVariante,
    ) -> Result<Value, AppError> {
        let id = positive_id(&Value::String(id.to_string()))
            .ok_or_else(|| AppError::BadRequest("id de variante inválido".into()))?;
        let variante = campos.into_validated()?;
        Ok(self.api.put(&format!("/variantes/{id}"), &variante, auth).await?)
    }
}
