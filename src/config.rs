// src/config.rs

use std::{env, net::SocketAddr};

use anyhow::Context;

use crate::{
    remote::ApiClient,
    services::{
        dashboard_service::{DashboardService, MetricsBoards},
        pagos_service::PagosService,
        productos_stats_service::ProductosStatsService,
        variantes_service::VariantesService,
    },
};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4001";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Raiz da API oficial, sem barra final.
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    /// `None` libera qualquer origem.
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        reqwest::Url::parse(&api_base_url)
            .with_context(|| format!("API_BASE_URL inválida: {api_base_url}"))?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR deve ser host:porta")?;

        let cors_allow_origin = env::var("CORS_ALLOW_ORIGIN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bind_addr,
            cors_allow_origin,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dashboard_service: DashboardService,
    pub metrics_boards: MetricsBoards,
    pub pagos_service: PagosService,
    pub variantes_service: VariantesService,
    pub productos_stats_service: ProductosStatsService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        // --- Monta o gráfico de dependências ---
        let api = ApiClient::new(&config.api_base_url)?;
        tracing::info!("✅ Cliente da API oficial apontando para {}", config.api_base_url);

        Ok(Self {
            dashboard_service: DashboardService::new(api.clone()),
            metrics_boards: MetricsBoards::default(),
            pagos_service: PagosService::new(api.clone()),
            variantes_service: VariantesService::new(api.clone()),
            productos_stats_service: ProductosStatsService::new(api),
            config,
        })
    }
}
