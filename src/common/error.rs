// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Falhas ao conversar com a API oficial.
#[derive(Debug, Error)]
pub enum RemoteError {
    // (a) Rede, DNS, conexão recusada...
    #[error("Falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    // (b) e (c): resposta não-2xx. `message` já vem extraída do corpo
    // (campo `error`/`message`) ou é o texto cru.
    #[error("API respondeu {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("URL inválida: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Validação com ordem de checagem: `headline` é a primeira falha
    #[error("{headline}")]
    InvalidFields {
        headline: String,
        errors: ValidationErrors,
    },

    // Regras que não cabem num único campo (pedido inexistente, etc.)
    #[error("{0}")]
    BadRequest(String),

    // O proxy sempre devolveu 400 com a mensagem da API oficial.
    #[error("{0}")]
    Upstream(String),

    #[error("API oficial indisponível")]
    UpstreamUnavailable,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Erros de validação cuja mensagem principal é a do primeiro campo
    /// que falhou em `check_order`.
    pub fn invalid_fields(errors: ValidationErrors, check_order: &[&str]) -> Self {
        let mut details = BTreeMap::new();
        collect_field_messages(&errors, &mut details);

        match check_order
            .iter()
            .find_map(|field| details.get(*field).and_then(|messages| messages.first()))
        {
            Some(first) => AppError::InvalidFields {
                headline: first.clone(),
                errors,
            },
            None => AppError::ValidationError(errors),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { message, .. } => AppError::Upstream(message),
            RemoteError::Transport(e) => {
                tracing::warn!("API oficial inacessível: {}", e);
                AppError::UpstreamUnavailable
            }
            RemoteError::InvalidUrl(url) => {
                AppError::InternalServerError(anyhow::anyhow!("URL inválida: {}", url))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação. Se só há uma mensagem
            // distinta, ela vira o `error` principal.
            AppError::ValidationError(errors) => return validation_response(None, &errors),
            AppError::InvalidFields { headline, errors } => {
                return validation_response(Some(headline), &errors);
            }
            AppError::BadRequest(message) | AppError::Upstream(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::UpstreamUnavailable => (
                StatusCode::BAD_GATEWAY,
                "No se pudo contactar la API oficial.".to_string(),
            ),
            ref e @ AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

fn validation_response(headline: Option<String>, errors: &ValidationErrors) -> Response {
    let mut details = BTreeMap::new();
    collect_field_messages(errors, &mut details);

    let headline = headline.unwrap_or_else(|| {
        let distinct: BTreeSet<&String> = details.values().flatten().collect();
        match distinct.into_iter().collect::<Vec<_>>().as_slice() {
            [only] => (*only).clone(),
            _ => "Uno o más campos son inválidos.".to_string(),
        }
    });
    let body = Json(json!({
        "error": headline,
        "details": details,
    }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

// Structs aninhados (`#[validate(nested)]`) são achatados pelo nome do campo.
fn collect_field_messages(errors: &ValidationErrors, into: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()));
                into.entry(field.to_string()).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_field_messages(inner, into),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_field_messages(inner, into);
                }
            }
        }
    }
}
