//! Salidas del tablero: página HTML con el grafo interactivo, tablas en
//! Markdown o el `Dashboard` completo como JSON.

mod html;
mod markdown;

pub use html::{escape_html, render_html};
pub use markdown::render_markdown;

use crate::dashboard::Dashboard;

pub fn render_json(dashboard: &Dashboard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dashboard)
}
