pub mod dashboard;
pub mod pagos;
pub mod productos;
pub mod variantes;
