//! Proyecciones tabulares sobre la tabla normalizada.
//!
//! Las tres tablas son independientes entre sí. Todos los ordenamientos son
//! estables: a igual valor se mantiene el orden de la planilla. El formato
//! de montos (`format_money`) se aplica sólo al momento de mostrar.

use serde::Serialize;

use crate::excel::round_cents;
use crate::graph::NetworkGraph;
use crate::models::{MemberTable, MemberType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    /// Posición 1-based después de ordenar
    pub position: usize,
    pub name: String,
    pub points: f64,
    pub historical_points: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InactiveMember {
    pub name: String,
    pub phone: String,
    pub inactive_cycles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Debtor {
    pub name: String,
    pub debt: f64,
    pub phone: String,
    pub sponsor_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtorReport {
    pub rows: Vec<Debtor>,
    pub total_debt: f64,
}

/// Ranking por puntos personales del periodo actual.
pub fn top_performers(table: &MemberTable, n: usize) -> Vec<TopPerformer> {
    let mut ranked: Vec<_> = table.rows.iter().collect();
    ranked.sort_by(|a, b| b.personal_points.total_cmp(&a.personal_points));

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, r)| TopPerformer {
            position: i + 1,
            name: r.display_name.clone(),
            points: round_cents(r.personal_points),
            historical_points: r.historical_points.map(round_cents),
        })
        .collect()
}

/// Socios con más de `min_cycles` catálogos inactivos y sin deuda.
pub fn inactive_without_debt(table: &MemberTable, min_cycles: u32) -> Vec<InactiveMember> {
    let mut rows: Vec<InactiveMember> = table
        .rows
        .iter()
        .filter(|r| r.inactive_cycles > min_cycles && r.debt == 0.0)
        .map(|r| InactiveMember {
            name: r.display_name.clone(),
            phone: r.phone.clone(),
            inactive_cycles: r.inactive_cycles,
        })
        .collect();
    rows.sort_by(|a, b| b.inactive_cycles.cmp(&a.inactive_cycles));
    rows
}

/// Socios con deuda, de mayor a menor, y la suma de sus deudas.
/// Tanto el orden como el total usan el valor numérico, nunca el texto formateado.
pub fn debtors(table: &MemberTable) -> DebtorReport {
    let mut rows: Vec<Debtor> = table
        .rows
        .iter()
        .filter(|r| r.debt > 0.0)
        .map(|r| Debtor {
            name: r.display_name.clone(),
            debt: r.debt,
            phone: r.phone.clone(),
            sponsor_name: r.sponsor_name.clone(),
        })
        .collect();
    rows.sort_by(|a, b| b.debt.total_cmp(&a.debt));
    let total_debt = rows.iter().map(|d| d.debt).sum();
    DebtorReport { rows, total_debt }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub members: usize,
    pub member_type_count: usize,
    pub other_type_count: usize,
    pub nodes: usize,
    pub edges: usize,
    pub roots: usize,
    pub dangling_sponsors: usize,
}

pub fn network_summary(table: &MemberTable, graph: &NetworkGraph) -> NetworkSummary {
    let member_type_count = table
        .rows
        .iter()
        .filter(|r| r.member_type == MemberType::Member)
        .count();
    NetworkSummary {
        members: table.len(),
        member_type_count,
        other_type_count: table.len() - member_type_count,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        roots: graph.roots().iter().filter(|n| n.is_declared()).count(),
        dangling_sponsors: graph.bare_nodes().len(),
    }
}

/// Monto con separador de miles y dos decimales: 1234567.5 -> "1,234,567.50".
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, dec_part)
}
