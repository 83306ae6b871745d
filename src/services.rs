pub mod dashboard_service;
pub use dashboard_service::{DashboardService, MetricsBoard, MetricsBoards};
pub mod pagos_service;
pub use pagos_service::PagosService;
pub mod variantes_service;
pub use variantes_service::VariantesService;
pub mod productos_stats_service;
pub use productos_stats_service::ProductosStatsService;
