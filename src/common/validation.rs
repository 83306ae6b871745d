// src/common/validation.rs
//
// Validadores customizados para o `validator`. O painel manda números ora
// como número, ora como string, então os campos chegam como `Value`.

use std::borrow::Cow;

use serde_json::Value;
use validator::ValidationError;

use crate::common::normalize::coerce_number;

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Inteiro positivo (IDs de pedido, produto, variante...).
pub fn positive_id(value: &Value) -> Option<u64> {
    coerce_number(value)
        .filter(|n| *n > 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
}

pub fn non_negative(value: &Value) -> Option<f64> {
    coerce_number(value).filter(|n| *n >= 0.0)
}

pub fn positive(value: &Value) -> Option<f64> {
    coerce_number(value).filter(|n| *n > 0.0)
}

/// Texto não vazio (após trim).
pub fn required_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

// --- Pagos ---

pub fn validate_id_pedido(value: &Value) -> Result<(), ValidationError> {
    positive_id(value)
        .map(|_| ())
        .ok_or_else(|| invalid("id_pedido", "ID de pedido inválido"))
}

pub fn validate_descripcion(value: &Value) -> Result<(), ValidationError> {
    required_text(value)
        .map(|_| ())
        .ok_or_else(|| invalid("required", "Descripción requerida"))
}

pub fn validate_monto_total(value: &Value) -> Result<(), ValidationError> {
    positive(value)
        .map(|_| ())
        .ok_or_else(|| invalid("range", "Monto total debe ser positivo"))
}

// Query strings: o valor chega sempre como texto
fn positive_integer_str(raw: &str) -> Option<u64> {
    positive_id(&Value::String(raw.to_string()))
}

pub fn parse_positive_integer(raw: Option<&str>, default: u64) -> Option<u64> {
    match raw {
        None => Some(default),
        Some(raw) => positive_integer_str(raw),
    }
}

pub fn validate_limit(raw: &str) -> Result<(), ValidationError> {
    positive_integer_str(raw)
        .map(|_| ())
        .ok_or_else(|| invalid("range", "limit inválido"))
}

pub fn validate_page(raw: &str) -> Result<(), ValidationError> {
    positive_integer_str(raw)
        .map(|_| ())
        .ok_or_else(|| invalid("range", "page inválido"))
}

pub fn validate_monto_min(raw: &str) -> Result<(), ValidationError> {
    non_negative(&Value::String(raw.to_string()))
        .map(|_| ())
        .ok_or_else(|| invalid("range", "monto_min debe ser positivo"))
}

// --- Variantes ---

pub fn validate_id_producto(value: &Value) -> Result<(), ValidationError> {
    positive_id(value)
        .map(|_| ())
        .ok_or_else(|| invalid("id_producto", "id_producto inválido"))
}

pub fn validate_precio_adicional(value: &Value) -> Result<(), ValidationError> {
    non_negative(value)
        .map(|_| ())
        .ok_or_else(|| invalid("range", "precio_adicional debe ser un número positivo"))
}

pub fn validate_stock(value: &Value) -> Result<(), ValidationError> {
    non_negative(value)
        .map(|_| ())
        .ok_or_else(|| invalid("range", "stock debe ser un número positivo"))
}

pub fn validate_nombre_valor(value: &Value) -> Result<(), ValidationError> {
    required_text(value)
        .map(|_| ())
        .ok_or_else(|| invalid("required", "nombre_variante y valor_variante requeridos"))
}
