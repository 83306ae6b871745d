// src/models/dashboard.rs

use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Os cards do topo do painel. As chaves JSON são as que o front já usa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct Metrics {
    #[serde(rename = "total_usuarios")]
    #[schema(example = 42)]
    pub total_users: u64,

    #[serde(rename = "total_productos")]
    #[schema(example = 17)]
    pub total_products: u64,

    #[serde(rename = "total_facturas")]
    #[schema(example = 120)]
    pub total_invoices: u64,

    #[serde(rename = "pedidos_pendientes")]
    #[schema(example = 3)]
    pub pending_orders: u64,

    #[serde(rename = "ingresos_mes")]
    #[schema(example = 15432.5)]
    pub monthly_revenue: f64,
}

/// Mês-alvo das métricas de receita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Valida via chrono: mês fora de 1..=12 ou ano absurdo dão None
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// "Dia 0 do mês seguinte": primeiro dia do próximo mês menos um.
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }

    /// Mês com dois dígitos, como a API espera (`02`).
    pub fn month_param(&self) -> String {
        format!("{:02}", self.month)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Estado exibido pelo painel: métricas + par carregando/erro.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DashboardSnapshot {
    pub metrics: Metrics,
    pub loading: bool,
    pub error: Option<String>,
    /// Mês (`YYYY-MM`) a que as métricas se referem; `None` antes da primeira carga.
    #[schema(example = "2024-02")]
    pub month: Option<String>,
    /// Geração da atualização que produziu estas métricas.
    pub generation: u64,
    /// `true` quando o pedido foi superado por outro mais recente: as
    /// métricas são as publicadas por ele, do mês indicado em `month`.
    pub superseded: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MetricsQuery {
    /// Ano (padrão: ano corrente)
    #[param(example = 2024)]
    pub year: Option<i32>,
    /// Mês 1-12 (padrão: mês corrente)
    #[param(example = 2)]
    pub month: Option<u32>,
}
