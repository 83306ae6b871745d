// src/services/pagos_service.rs

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Map, Value};

use crate::{
    common::{
        error::AppError,
        normalize::{extract_array, is_present, unwrap_data},
        validation::positive_id,
    },
    middleware::auth::AuthContext,
    models::pagos::{ConsultaPagosQuery, CrearPagoPayload, PaginaPagos, PaginacionQuery},
    remote::ApiClient,
};

const PEDIDO_INEXISTENTE: &str = "No se puede generar el pago: pedido inexistente";

#[derive(Clone)]
pub struct PagosService {
    api: ApiClient,
}

impl PagosService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Valida, confere se o pedido existe e só então cria o pagamento.
    pub async fn crear(&self, auth: &AuthContext, payload: CrearPagoPayload) -> Result<Value, AppError> {
        let pago = payload.into_validated()?;

        let pedido = self
            .api
            .get(&format!("/pedidos/{}", pago.id_pedido), &[], auth)
            .await;
        match pedido {
            Ok(raw) if is_present(unwrap_data(&raw)) => {}
            Ok(_) => return Err(AppError::BadRequest(PEDIDO_INEXISTENTE.into())),
            Err(err) => {
                tracing::debug!(id_pedido = pago.id_pedido, error = %err, "pedido não encontrado");
                return Err(AppError::BadRequest(PEDIDO_INEXISTENTE.into()));
            }
        }

        Ok(self.api.post("/pagos", &pago, auth).await?)
    }

    pub async fn consulta(&self, auth: &AuthContext, query: ConsultaPagosQuery) -> Result<Value, AppError> {
        let params = query.into_forwarded()?;
        Ok(self.api.get("/pagos/consulta", &params, auth).await?)
    }

    /// Lista todos os pagamentos, mais recentes primeiro, e pagina aqui.
    pub async fn admin_list(&self, auth: &AuthContext, query: PaginacionQuery) -> Result<PaginaPagos, AppError> {
        let (limit, page) = query.into_validated()?;

        let raw = self.api.get("/pagos", &[], auth).await?;
        let mut pagos = extract_array(&raw, &["data", "result"]);
        pagos.sort_by_key(|p| Reverse(created_at_millis(p)));

        let total = pagos.len();
        let start = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let data = pagos
            .into_iter()
            .skip(start)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        Ok(PaginaPagos { data, total, page, limit })
    }

    /// Mock de aprovação: cria o pagamento e devolve como aprovado.
    pub async fn simular_aprobacion(&self, auth: &AuthContext, body: Value) -> Result<Value, AppError> {
        let created = self.api.post("/pagos", &body, auth).await?;

        let mut enriched = match unwrap_data(&created) {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        enriched.insert("estado".into(), json!("aprobado"));
        enriched.insert("simulacion".into(), json!(true));

        // Melhor esforço: falha ao mover o pedido não derruba a simulação
        if let Some(id_pedido) = body.get("id_pedido").and_then(positive_id) {
            let estado = json!({ "estado": "procesando" });
            if let Err(err) = self
                .api
                .put(&format!("/pedidos/{id_pedido}/estado"), &estado, auth)
                .await
            {
                tracing::warn!(id_pedido, error = %err, "não foi possível marcar o pedido como procesando");
            }
        }

        Ok(json!({ "data": enriched }))
    }
}

// Sem data (ou data ilegível) conta como o mais antigo.
fn created_at_millis(pago: &Value) -> i64 {
    match pago.get("created_at") {
        Some(Value::String(s)) => parse_timestamp(s).unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        _ => 0,
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
