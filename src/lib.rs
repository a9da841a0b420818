// Biblioteca raíz del crate `mlm-dashboard`.
// Reexporta los módulos principales y proporciona `run_dashboard`, que
// orquesta el flujo completo: carga -> grafo -> reportes.
pub mod config;
pub mod dashboard;
pub mod error;
pub mod excel;
pub mod graph;
pub mod models;
pub mod render;
pub mod reports;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ConfigError, LoadError};
pub use excel::SourceFormat;

/// Procesa un archivo subido. La tabla parseada queda memoizada por contenido,
/// así que repetir la llamada con los mismos bytes no vuelve a leer la planilla.
pub fn run_dashboard(bytes: &[u8], format: SourceFormat, config: &DashboardConfig) -> Result<Dashboard, LoadError> {
    let table = excel::load_table_cached(bytes, format)?;
    Ok(Dashboard::build(&table, config))
}
