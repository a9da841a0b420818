use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::reports::{format_money, TopPerformer};

/// Las tablas del tablero en Markdown (sin el grafo).
pub fn render_markdown(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Red MLM - Reporte de desempeño");
    let _ = writeln!(
        output,
        "Generado {} para {} socios ({} Member, {} otros); {} aristas, {} raíces, {} patrocinadores sin fila.",
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC"),
        dashboard.summary.members,
        dashboard.summary.member_type_count,
        dashboard.summary.other_type_count,
        dashboard.summary.edges,
        dashboard.summary.roots,
        dashboard.summary.dangling_sponsors
    );

    if let Some(top) = dashboard.top_performers.as_deref() {
        write_top(&mut output, top, &dashboard.historical_columns);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Inactivos sin deuda");
    if dashboard.inactive_without_debt.is_empty() {
        let _ = writeln!(output, "No hay socios inactivos sin deuda.");
    } else {
        let _ = writeln!(output, "| Nombre del Socio | Teléfono | Catálogos Inactivo |");
        let _ = writeln!(output, "|---|---|---:|");
        for m in dashboard.inactive_without_debt.iter() {
            let _ = writeln!(output, "| {} | {} | {} |", cell(&m.name), cell(&m.phone), m.inactive_cycles);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Socios con deuda");
    if dashboard.debtors.rows.is_empty() {
        let _ = writeln!(output, "No hay socios con deuda.");
    } else {
        let _ = writeln!(output, "| Nombre del Socio | Deuda | Teléfono | Patrocinador |");
        let _ = writeln!(output, "|---|---:|---|---|");
        for d in dashboard.debtors.rows.iter() {
            let _ = writeln!(
                output,
                "| {} | ${} | {} | {} |",
                cell(&d.name),
                format_money(d.debt),
                cell(&d.phone),
                cell(d.sponsor_name.as_deref().unwrap_or(""))
            );
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "**Deuda total: ${}**", format_money(dashboard.debtors.total_debt));
    }

    output
}

fn write_top(output: &mut String, top: &[TopPerformer], historical_columns: &[usize]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Top {} socios por VEP", top.len());
    if top.is_empty() {
        let _ = writeln!(output, "Sin socios en la planilla.");
        return;
    }
    let mut header = String::from("| # | Nombre del Socio | VEP |");
    let mut rule = String::from("|---|---|---:|");
    for i in historical_columns.iter() {
        let _ = write!(header, " VEP Mes {} |", i + 1);
        rule.push_str("---:|");
    }
    let _ = writeln!(output, "{}", header);
    let _ = writeln!(output, "{}", rule);
    for p in top.iter() {
        let _ = write!(output, "| {} | {} | {:.2} |", p.position, cell(&p.name), p.points);
        for i in historical_columns.iter() {
            let _ = write!(output, " {:.2} |", p.historical_points[*i]);
        }
        let _ = writeln!(output);
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
