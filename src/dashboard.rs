use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::DashboardConfig;
use crate::graph::{build_network, GraphView};
use crate::models::{Column, MemberTable};
use crate::reports::{debtors, inactive_without_debt, network_summary, top_performers, DebtorReport, InactiveMember, NetworkSummary, TopPerformer};

/// Resultado completo de una carga: grafo listo para dibujar y las tres tablas.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub summary: NetworkSummary,
    pub graph: GraphView,
    /// `None` si la planilla no trae columna de puntos personales (VEP)
    pub top_performers: Option<Vec<TopPerformer>>,
    /// Índices (0..3) de las columnas históricas presentes en la planilla
    pub historical_columns: Vec<usize>,
    pub inactive_without_debt: Vec<InactiveMember>,
    pub debtors: DebtorReport,
}

impl Dashboard {
    pub fn build(table: &MemberTable, config: &DashboardConfig) -> Dashboard {
        let network = build_network(table, &config.thresholds);
        let historical_columns = Column::HISTORICAL
            .iter()
            .enumerate()
            .filter(|(_, c)| table.has_column(**c))
            .map(|(i, _)| i)
            .collect();

        let top = if table.has_column(Column::PersonalPoints) {
            Some(top_performers(table, config.reports.top_n))
        } else {
            info!("la planilla no tiene columna VEP; se omite el ranking");
            None
        };

        Dashboard {
            generated_at: Utc::now(),
            summary: network_summary(table, &network),
            graph: network.to_view(&config.palette),
            top_performers: top,
            historical_columns,
            inactive_without_debt: inactive_without_debt(table, config.reports.inactive_report_min),
            debtors: debtors(table),
        }
    }
}
