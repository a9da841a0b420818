use std::fmt::Write;

use tracing::warn;

use crate::dashboard::Dashboard;
use crate::reports::format_money;

const VIS_NETWORK_JS: &str = "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Escapa texto para insertarlo en HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// JSON embebido en `<script>`: evita que un "</script>" dentro de los datos cierre la etiqueta.
/// Si la serialización falla se registra y se inserta un arreglo vacío.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            warn!(error = %e, "no se pudo serializar el grafo; se dibuja vacío");
            "[]".to_string()
        }
    }
}

/// Página autocontenida: grafo interactivo (vis-network) + tablas.
pub fn render_html(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"es\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>Red MLM - Desempeño</title>");
    let _ = writeln!(out, "<script src=\"{}\"></script>", VIS_NETWORK_JS);
    let _ = writeln!(out, "<style>");
    let _ = writeln!(out, "body {{ font-family: sans-serif; margin: 1.5rem; }}");
    let _ = writeln!(out, "#red {{ width: 100%; height: 600px; border: 1px solid #ccc; }}");
    let _ = writeln!(out, "table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}");
    let _ = writeln!(out, "th, td {{ border: 1px solid #ddd; padding: 4px 8px; }}");
    let _ = writeln!(out, "td.num {{ text-align: right; }}");
    let _ = writeln!(out, "div.vis-tooltip {{ white-space: pre-line; }}");
    let _ = writeln!(out, "</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<h1>Red MLM - Desempeño</h1>");
    let _ = writeln!(
        out,
        "<p>Generado {} · {} socios · {} aristas · {} patrocinadores sin fila</p>",
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC"),
        dashboard.summary.members,
        dashboard.summary.edges,
        dashboard.summary.dangling_sponsors
    );

    let _ = writeln!(out, "<div id=\"red\"></div>");
    let _ = writeln!(out, "<script>");
    let _ = writeln!(out, "const nodes = new vis.DataSet({});", script_json(&dashboard.graph.nodes));
    let _ = writeln!(out, "const edges = new vis.DataSet({});", script_json(&dashboard.graph.edges));
    let _ = writeln!(
        out,
        "new vis.Network(document.getElementById(\"red\"), {{ nodes, edges }}, {{ edges: {{ arrows: \"to\" }}, physics: {{ stabilization: true }} }});"
    );
    let _ = writeln!(out, "</script>");

    write_top_table(&mut out, dashboard);
    write_inactive_table(&mut out, dashboard);
    write_debtor_table(&mut out, dashboard);

    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn write_top_table(out: &mut String, dashboard: &Dashboard) {
    let Some(top) = dashboard.top_performers.as_deref() else {
        return;
    };
    let _ = writeln!(out, "<h2>Top {} socios por VEP</h2>", top.len());
    if top.is_empty() {
        let _ = writeln!(out, "<p>Sin socios en la planilla.</p>");
        return;
    }
    let _ = write!(out, "<table><tr><th>#</th><th>Nombre del Socio</th><th>VEP</th>");
    for i in dashboard.historical_columns.iter() {
        let _ = write!(out, "<th>VEP Mes {}</th>", i + 1);
    }
    let _ = writeln!(out, "</tr>");
    for p in top.iter() {
        let _ = write!(
            out,
            "<tr><td class=\"num\">{}</td><td>{}</td><td class=\"num\">{:.2}</td>",
            p.position,
            escape_html(&p.name),
            p.points
        );
        for i in dashboard.historical_columns.iter() {
            let _ = write!(out, "<td class=\"num\">{:.2}</td>", p.historical_points[*i]);
        }
        let _ = writeln!(out, "</tr>");
    }
    let _ = writeln!(out, "</table>");
}

fn write_inactive_table(out: &mut String, dashboard: &Dashboard) {
    let _ = writeln!(out, "<h2>Inactivos sin deuda</h2>");
    if dashboard.inactive_without_debt.is_empty() {
        let _ = writeln!(out, "<p>No hay socios inactivos sin deuda.</p>");
        return;
    }
    let _ = writeln!(out, "<table><tr><th>Nombre del Socio</th><th>Teléfono</th><th>Catálogos Inactivo</th></tr>");
    for m in dashboard.inactive_without_debt.iter() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
            escape_html(&m.name),
            escape_html(&m.phone),
            m.inactive_cycles
        );
    }
    let _ = writeln!(out, "</table>");
}

fn write_debtor_table(out: &mut String, dashboard: &Dashboard) {
    let _ = writeln!(out, "<h2>Socios con deuda</h2>");
    if dashboard.debtors.rows.is_empty() {
        let _ = writeln!(out, "<p>No hay socios con deuda.</p>");
        return;
    }
    let _ = writeln!(
        out,
        "<table><tr><th>Nombre del Socio</th><th>Deuda</th><th>Teléfono</th><th>Patrocinador</th></tr>"
    );
    for d in dashboard.debtors.rows.iter() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">${}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&d.name),
            format_money(d.debt),
            escape_html(&d.phone),
            escape_html(d.sponsor_name.as_deref().unwrap_or(""))
        );
    }
    let _ = writeln!(out, "</table>");
    let _ = writeln!(
        out,
        "<p><strong>Deuda total: ${}</strong></p>",
        format_money(dashboard.debtors.total_debt)
    );
}
