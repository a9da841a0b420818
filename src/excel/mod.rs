//! Módulo `excel`: lectura y normalización de la planilla de socios.
//!
//! Submódulos:
//! - `io`: conversión de celdas y lectura de hojas / CSV
//! - `columns`: resolución de encabezados de la plantilla a columnas lógicas
//! - `loader`: normalización fila por fila (`load_table`)
//! - `cache`: memoización por contenido del archivo subido

/// Helpers de IO y utilidades para parsing de celdas
pub mod io;

/// Encabezados aceptados y lectura segura con valor por defecto
pub mod columns;

/// Carga de la planilla: `load_table`
pub mod loader;

/// Caché por identidad de contenido: `load_table_cached`
pub mod cache;

pub use cache::{global_cache, load_table_cached, TableCache};
pub use columns::ColumnMap;
pub use loader::{load_table, normalize_debt, normalize_phone, round_cents, table_from_rows, SourceFormat};
