// src/services/dashboard_service.rs

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    common::{
        error::RemoteError,
        normalize::{coerce_number, extract_array, first_present, sum_amounts, INVOICE_KEYS, LIST_KEYS},
    },
    middleware::auth::{AuthContext, Role},
    models::dashboard::{DashboardSnapshot, Metrics, YearMonth},
    remote::ApiClient,
};

// --- Endpoints da API oficial ---
pub const SYSTEM_STATS_PATH: &str = "/superadmin/system-stats";
pub const DOMAIN_STATS_PATH: &str = "/facturas/admin/estadisticas";
pub const USERS_PATH: &str = "/users";
pub const PRODUCTS_PATH: &str = "/productos";
pub const INVOICES_PATH: &str = "/facturas/admin/todas";
pub const ORDERS_PATH: &str = "/pedidos";
pub const REVENUE_MONTH_PATH: &str = "/admin/stats/revenue-month";
pub const INVOICE_SEARCH_PATH: &str = "/facturas/admin/buscar";

pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar estadísticas";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Users,
    Products,
    Invoices,
    PendingOrders,
    Revenue,
}

impl MetricField {
    pub fn label(self) -> &'static str {
        match self {
            MetricField::Users => "total_usuarios",
            MetricField::Products => "total_productos",
            MetricField::Invoices => "total_facturas",
            MetricField::PendingOrders => "pedidos_pendientes",
            MetricField::Revenue => "ingresos_mes",
        }
    }
}

/// Onde procurar um campo na resposta: chaves sinônimas, em ordem.
#[derive(Debug, Clone, Copy)]
pub struct FieldAdapter {
    pub field: MetricField,
    pub keys: &'static [&'static str],
}

impl FieldAdapter {
    /// Só na raiz do objeto.
    pub fn read_root(&self, raw: &Value) -> Option<f64> {
        raw.as_object()
            .and_then(|root| first_present(root, self.keys))
            .and_then(coerce_number)
    }

    /// Procura primeiro em `data` (se for objeto), depois na raiz.
    pub fn read(&self, raw: &Value) -> Option<f64> {
        let nested = raw
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| first_present(data, self.keys));
        let root = || raw.as_object().and_then(|root| first_present(root, self.keys));

        nested.or_else(root).and_then(coerce_number)
    }
}

pub const SUMMARY_ADAPTERS: [FieldAdapter; 5] = [
    FieldAdapter {
        field: MetricField::Users,
        keys: &["total_usuarios", "users_count"],
    },
    FieldAdapter {
        field: MetricField::Products,
        keys: &["total_productos", "productos", "products_count"],
    },
    FieldAdapter {
        field: MetricField::Invoices,
        keys: &["total_facturas", "facturas", "invoices_count"],
    },
    FieldAdapter {
        field: MetricField::PendingOrders,
        keys: &["pedidos_pendientes", "pedidos", "orders_pending"],
    },
    FieldAdapter {
        field: MetricField::Revenue,
        keys: &["ingresos_mes", "ingresos", "sales_month"],
    },
];

pub const REVENUE_MONTH_ADAPTER: FieldAdapter = FieldAdapter {
    field: MetricField::Revenue,
    keys: &["ingresos_mes", "ingresos", "monto", "total", "revenue"],
};

/// Resumo primário já lido pelos adaptadores. `None` = campo ausente.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSummary {
    pub users: Option<f64>,
    pub products: Option<f64>,
    pub invoices: Option<f64>,
    pub pending_orders: Option<f64>,
    pub revenue: Option<f64>,
}

impl StatsSummary {
    pub fn from_raw(raw: &Value) -> Self {
        let mut summary = StatsSummary::default();
        for adapter in &SUMMARY_ADAPTERS {
            let value = adapter.read(raw);
            match adapter.field {
                MetricField::Users => summary.users = value,
                MetricField::Products => summary.products = value,
                MetricField::Invoices => summary.invoices = value,
                MetricField::PendingOrders => summary.pending_orders = value,
                MetricField::Revenue => summary.revenue = value,
            }
        }
        summary
    }

    /// Métricas do passo 1: só valores positivos sobrevivem.
    pub fn to_metrics(&self) -> Metrics {
        Metrics {
            total_users: as_count(self.users),
            total_products: as_count(self.products),
            total_invoices: as_count(self.invoices),
            pending_orders: as_count(self.pending_orders),
            monthly_revenue: positive(self.revenue).unwrap_or(0.0),
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn as_count(value: Option<f64>) -> u64 {
    positive(value).map(|v| v.round() as u64).unwrap_or(0)
}

/// Resultado de um fallback, marcado com o campo que ele alimenta.
#[derive(Debug)]
pub struct Settled<T> {
    pub field: MetricField,
    pub outcome: Result<T, RemoteError>,
}

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Monta as métricas do painel. Só falha quando o resumo primário falha;
    /// fallbacks que falham mantêm o valor do resumo (ou 0).
    pub async fn compute_metrics(
        &self,
        auth: &AuthContext,
        target: YearMonth,
    ) -> Result<Metrics, RemoteError> {
        // 1. Resumo primário, conforme o papel
        let summary_path = match auth.role {
            Role::SuperAdmin => SYSTEM_STATS_PATH,
            Role::Admin => DOMAIN_STATS_PATH,
        };
        // Resposta não-2xx é tolerada: vira `{}` e os fallbacks cobrem tudo.
        // Só falha de transporte interrompe a carga.
        let raw = match self.api.get(summary_path, &[], auth).await {
            Ok(raw) => raw,
            Err(RemoteError::Status { status, message }) => {
                warn!(%status, %message, path = summary_path, "resumo de estatísticas recusado; usando fallbacks");
                Value::Object(Map::new())
            }
            Err(err) => return Err(err),
        };
        let summary = StatsSummary::from_raw(&raw);
        let mut metrics = summary.to_metrics();

        // 2 + 3. Todos os fallbacks em paralelo, esperando todos terminarem
        let (users, products, invoices, orders, revenue) = tokio::join!(
            self.count_fallback(MetricField::Users, summary.users, USERS_PATH, auth),
            self.count_fallback(MetricField::Products, summary.products, PRODUCTS_PATH, auth),
            self.count_fallback(MetricField::Invoices, summary.invoices, INVOICES_PATH, auth),
            self.count_fallback(MetricField::PendingOrders, summary.pending_orders, ORDERS_PATH, auth),
            self.revenue_fallback(auth, target),
        );

        for settled in [users, products, invoices, orders].into_iter().flatten() {
            match settled.outcome {
                Ok(count) => match settled.field {
                    MetricField::Users => metrics.total_users = count,
                    MetricField::Products => metrics.total_products = count,
                    MetricField::Invoices => metrics.total_invoices = count,
                    MetricField::PendingOrders => metrics.pending_orders = count,
                    MetricField::Revenue => {}
                },
                Err(err) => warn!(
                    field = settled.field.label(),
                    error = %err,
                    "fallback de contagem falhou; mantendo valor do resumo"
                ),
            }
        }

        match revenue.outcome {
            Ok(amount) => metrics.monthly_revenue = amount.max(0.0),
            Err(err) => warn!(
                field = revenue.field.label(),
                month = %target,
                error = %err,
                "fallback de receita falhou; mantendo valor do resumo"
            ),
        }

        Ok(metrics)
    }

    // `None` quando o resumo já trouxe um valor positivo.
    async fn count_fallback(
        &self,
        field: MetricField,
        summary_value: Option<f64>,
        path: &str,
        auth: &AuthContext,
    ) -> Option<Settled<u64>> {
        if positive(summary_value).is_some() {
            return None;
        }

        let outcome = self
            .api
            .get(path, &[], auth)
            .await
            .map(|raw| extract_array(&raw, LIST_KEYS).len() as u64);

        Some(Settled { field, outcome })
    }

    async fn revenue_fallback(&self, auth: &AuthContext, target: YearMonth) -> Settled<f64> {
        let field = MetricField::Revenue;

        // A. Endpoint dedicado; só vale se for positivo
        let query = [
            ("year", target.year().to_string()),
            ("month", target.month_param()),
        ];
        match self.api.get(REVENUE_MONTH_PATH, &query, auth).await {
            Ok(raw) => {
                if let Some(amount) = positive(REVENUE_MONTH_ADAPTER.read_root(&raw)) {
                    return Settled { field, outcome: Ok(amount) };
                }
            }
            Err(err) => debug!(error = %err, "receita mensal indisponível; somando faturas"),
        }

        // B. Faturas do mês inteiro, do dia 1 ao último dia do calendário
        let query = [
            ("fecha_inicio", target.first_day().format("%Y-%m-%d").to_string()),
            ("fecha_fin", target.last_day().format("%Y-%m-%d").to_string()),
        ];
        let outcome = self
            .api
            .get(INVOICE_SEARCH_PATH, &query, auth)
            .await
            .map(|raw| sum_amounts(&extract_array(&raw, INVOICE_KEYS)));

        Settled { field, outcome }
    }
}

// ---
// Guarda de geração: só a atualização mais recente publica.
// ---

struct BoardInner {
    generation: AtomicU64,
    snapshot: Mutex<DashboardSnapshot>,
}

/// O que o painel de uma sessão está mostrando.
#[derive(Clone)]
pub struct MetricsBoard {
    inner: Arc<BoardInner>,
}

impl Default for MetricsBoard {
    fn default() -> Self {
        Self {
            inner: Arc::new(BoardInner {
                generation: AtomicU64::new(0),
                snapshot: Mutex::new(DashboardSnapshot::default()),
            }),
        }
    }
}

impl MetricsBoard {
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.lock().clone()
    }

    /// Recalcula e publica, a menos que outra atualização tenha começado
    /// nesse meio tempo. Devolve o que o painel mostra ao final.
    pub async fn refresh(
        &self,
        service: &DashboardService,
        auth: &AuthContext,
        target: YearMonth,
    ) -> DashboardSnapshot {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut snapshot = self.lock();
            snapshot.loading = true;
            snapshot.error = None;
        }

        let result = service.compute_metrics(auth, target).await;

        let mut snapshot = self.lock();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, month = %target, "atualização superada; resultado descartado");
            return DashboardSnapshot {
                superseded: true,
                ..snapshot.clone()
            };
        }

        *snapshot = match result {
            Ok(metrics) => DashboardSnapshot {
                metrics,
                loading: false,
                error: None,
                month: Some(target.to_string()),
                generation,
                superseded: false,
            },
            Err(err) => {
                warn!(error = %err, month = %target, "falha ao carregar o resumo de estatísticas");
                DashboardSnapshot {
                    metrics: Metrics::default(),
                    loading: false,
                    error: Some(LOAD_ERROR_MESSAGE.to_string()),
                    month: Some(target.to_string()),
                    generation,
                    superseded: false,
                }
            }
        };
        snapshot.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DashboardSnapshot> {
        self.inner.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Um painel por credencial, vivo só enquanto há atualização em andamento.
#[derive(Clone, Default)]
pub struct MetricsBoards {
    boards: Arc<Mutex<HashMap<String, MetricsBoard>>>,
}

impl MetricsBoards {
    pub fn board_for(&self, auth: &AuthContext) -> MetricsBoard {
        let mut boards = self.lock();
        boards.entry(auth.session_key()).or_default().clone()
    }

    /// Devolve o painel obtido em `board_for` e descarta todo painel que só
    /// o mapa ainda referencia (inclusive os de pedidos cancelados).
    pub fn release(&self, board: MetricsBoard) {
        let mut boards = self.lock();
        drop(board);
        boards.retain(|_, b| Arc::strong_count(&b.inner) > 1);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MetricsBoard>> {
        self.boards.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
