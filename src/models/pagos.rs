// src/models/pagos.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    error::AppError,
    normalize::coerce_number,
    validation::{
        parse_positive_integer, positive_id, required_text, validate_descripcion,
        validate_id_pedido, validate_limit, validate_monto_min, validate_monto_total,
        validate_page,
    },
};

pub const DEFAULT_LIMIT: u64 = 25;
pub const DEFAULT_PAGE: u64 = 1;

// Ordem em que as regras são checadas; a primeira falha vira a mensagem.
const PAGO_CHECKS: &[&str] = &["id_pedido", "descripcion", "monto_total"];
const FILTRO_CHECKS: &[&str] = &["limit", "page", "monto_min"];

// ---
// Payload: criação de pagamento (validador)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CrearPagoPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_id_pedido"))]
    #[schema(value_type = i64, example = 12)]
    pub id_pedido: Value,

    #[serde(default)]
    #[validate(custom(function = "validate_descripcion"))]
    #[schema(value_type = String, example = "Pago del pedido #12")]
    pub descripcion: Value,

    #[serde(default)]
    #[validate(custom(function = "validate_monto_total"))]
    #[schema(value_type = f64, example = 1999.9)]
    pub monto_total: Value,
}

/// Corpo enviado à API oficial depois da validação.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NuevoPago {
    pub id_pedido: u64,
    pub descripcion: String,
    pub monto_total: f64,
}

impl CrearPagoPayload {
    pub fn into_validated(self) -> Result<NuevoPago, AppError> {
        self.validate()
            .map_err(|e| AppError::invalid_fields(e, PAGO_CHECKS))?;

        Ok(NuevoPago {
            id_pedido: positive_id(&self.id_pedido).unwrap_or_default(),
            descripcion: required_text(&self.descripcion).unwrap_or_default().to_string(),
            monto_total: coerce_number(&self.monto_total).unwrap_or_default(),
        })
    }
}

// ---
// Query: consulta filtrada
// ---
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct ConsultaPagosQuery {
    /// Estado do pagamento (ex.: `aprobado`)
    pub estado: Option<String>,

    #[validate(custom(function = "validate_monto_min"))]
    #[param(example = "100")]
    pub monto_min: Option<String>,

    #[validate(custom(function = "validate_limit"))]
    #[param(example = "25")]
    pub limit: Option<String>,

    #[validate(custom(function = "validate_page"))]
    #[param(example = "1")]
    pub page: Option<String>,
}

impl ConsultaPagosQuery {
    /// Parâmetros repassados à API oficial, já normalizados.
    pub fn into_forwarded(self) -> Result<Vec<(&'static str, String)>, AppError> {
        self.validate()
            .map_err(|e| AppError::invalid_fields(e, FILTRO_CHECKS))?;

        let mut params = Vec::with_capacity(4);
        if let Some(estado) = self.estado.filter(|e| !e.is_empty()) {
            params.push(("estado", estado));
        }
        if let Some(monto_min) = self.monto_min {
            params.push(("monto_min", monto_min));
        }
        let limit = parse_positive_integer(self.limit.as_deref(), DEFAULT_LIMIT).unwrap_or(DEFAULT_LIMIT);
        let page = parse_positive_integer(self.page.as_deref(), DEFAULT_PAGE).unwrap_or(DEFAULT_PAGE);
        params.push(("limit", limit.to_string()));
        params.push(("page", page.to_string()));
        Ok(params)
    }
}

// ---
// Query: listagem admin paginada localmente
// ---
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct PaginacionQuery {
    #[validate(custom(function = "validate_limit"))]
    #[param(example = "25")]
    pub limit: Option<String>,

    #[validate(custom(function = "validate_page"))]
    #[param(example = "1")]
    pub page: Option<String>,
}

impl PaginacionQuery {
    /// `(limit, page)`
    pub fn into_validated(self) -> Result<(u64, u64), AppError> {
        self.validate()
            .map_err(|e| AppError::invalid_fields(e, FILTRO_CHECKS))?;
        let limit = parse_positive_integer(self.limit.as_deref(), DEFAULT_LIMIT).unwrap_or(DEFAULT_LIMIT);
        let page = parse_positive_integer(self.page.as_deref(), DEFAULT_PAGE).unwrap_or(DEFAULT_PAGE);
        Ok((limit, page))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginaPagos {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
    pub total: usize,
    pub page: u64,
    pub limit: u64,
}
