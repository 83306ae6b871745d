// src/models/variantes.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    error::AppError,
    validation::{
        non_negative, positive_id, required_text, validate_id_producto, validate_nombre_valor,
        validate_precio_adicional, validate_stock,
    },
};

// Ordem em que as regras são checadas; a primeira falha vira a mensagem.
const VARIANTE_CHECKS: &[&str] = &[
    "id_producto",
    "precio_adicional",
    "stock",
    "nombre_variante",
    "valor_variante",
];

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CrearVariantePayload {
    #[serde(default)]
    #[validate(custom(function = "validate_id_producto"))]
    #[schema(value_type = i64, example = 8)]
    pub id_producto: Value,

    #[serde(flatten)]
    #[validate(nested)]
    pub campos: CamposVariante,
}

// Campos comuns a criação e edição
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CamposVariante {
    #[serde(default)]
    #[validate(custom(function = "validate_nombre_valor"))]
    #[schema(value_type = String, example = "Color")]
    pub nombre_variante: Value,

    #[serde(default)]
    #[validate(custom(function = "validate_nombre_valor"))]
    #[schema(value_type = String, example = "Negro")]
    pub valor_variante: Value,

    #[serde(default)]
    #[validate(custom(function = "validate_precio_adicional"))]
    #[schema(value_type = f64, example = 150.0)]
    pub precio_adicional: Value,

    #[serde(default)]
    #[validate(custom(function = "validate_stock"))]
    #[schema(value_type = f64, example = 10)]
    pub stock: Value,
}

/// Corpo de variante aceito pela API oficial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianteValidada {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_producto: Option<u64>,
    pub nombre_variante: String,
    pub valor_variante: String,
    pub precio_adicional: f64,
    pub stock: f64,
}

impl CamposVariante {
    pub fn into_validated(self) -> Result<VarianteValidada, AppError> {
        self.validate()
            .map_err(|e| AppError::invalid_fields(e, VARIANTE_CHECKS))?;
        Ok(self.to_variante(None))
    }

    fn to_variante(&self, id_producto: Option<u64>) -> VarianteValidada {
        VarianteValidada {
            id_producto,
            nombre_variante: required_text(&self.nombre_variante).unwrap_or_default().to_string(),
            valor_variante: required_text(&self.valor_variante).unwrap_or_default().to_string(),
            precio_adicional: non_negative(&self.precio_adicional).unwrap_or_default(),
            stock: non_negative(&self.stock).unwrap_or_default(),
        }
    }
}

impl CrearVariantePayload {
    pub fn into_validated(self) -> Result<VarianteValidada, AppError> {
        self.validate()
            .map_err(|e| AppError::invalid_fields(e, VARIANTE_CHECKS))?;
        let id_producto = positive_id(&self.id_producto);
        Ok(self.campos.to_variante(id_producto))
    }
}
