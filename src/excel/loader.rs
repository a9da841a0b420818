use std::path::Path;

use calamine::Data;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::excel::columns::ColumnMap;
use crate::excel::io::{is_blank_row, read_csv_rows, read_first_sheet};
use crate::models::{
    Column, MemberRecord, MemberTable, MemberType, ID_DESCONOCIDO, NOMBRE_POR_DEFECTO, TELEFONO_POR_DEFECTO,
    ULTIMA_COMPRA_POR_DEFECTO,
};

/// Prefijo de país que se elimina de los teléfonos (México).
pub const PREFIJO_PAIS: &str = "52";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceFormat {
    /// xlsx / xlsm / xlsb / xls / ods, detectado por calamine
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> SourceFormat {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("txt") => SourceFormat::Csv,
            _ => SourceFormat::Workbook,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SourceFormat::Workbook => "workbook",
            SourceFormat::Csv => "csv",
        }
    }
}

/// Lee el archivo subido y devuelve la tabla normalizada.
/// Un archivo que no se puede interpretar en el formato indicado es un error
/// terminal; columnas o valores faltantes nunca lo son.
pub fn load_table(bytes: &[u8], format: SourceFormat) -> Result<MemberTable, LoadError> {
    let raw_rows = match format {
        SourceFormat::Workbook => read_first_sheet(bytes)?,
        SourceFormat::Csv => read_csv_rows(bytes)?,
    };
    let table = table_from_rows(&raw_rows);
    info!(
        formato = format.tag(),
        filas = table.len(),
        columnas = table.columns.len(),
        "planilla cargada"
    );
    Ok(table)
}

/// Primera fila = encabezados; el resto se normaliza fila por fila.
pub fn table_from_rows(raw_rows: &[Vec<Data>]) -> MemberTable {
    let mut rows_iter = raw_rows.iter();
    let Some(header_row) = rows_iter.next() else {
        return MemberTable::default();
    };
    let columns = ColumnMap::from_headers(header_row);

    let mut rows = Vec::new();
    for (i, row) in rows_iter.enumerate() {
        if is_blank_row(row) {
            debug!(fila = i + 2, "fila vacía omitida");
            continue;
        }
        rows.push(normalize_row(&columns, row));
    }

    MemberTable::new(rows, columns.present())
}

pub fn normalize_row(columns: &ColumnMap, row: &[Data]) -> MemberRecord {
    let mut historical_points = [0.0; 3];
    for (slot, column) in historical_points.iter_mut().zip(Column::HISTORICAL) {
        *slot = columns.number(row, column).unwrap_or(0.0);
    }

    MemberRecord {
        member_id: columns
            .text(row, Column::MemberId)
            .unwrap_or_else(|| ID_DESCONOCIDO.to_string()),
        sponsor_id: columns.text(row, Column::SponsorId),
        display_name: columns
            .text(row, Column::DisplayName)
            .unwrap_or_else(|| NOMBRE_POR_DEFECTO.to_string()),
        member_type: columns
            .text(row, Column::MemberType)
            .map(|t| MemberType::parse(&t))
            .unwrap_or_default(),
        personal_points: columns.number(row, Column::PersonalPoints).unwrap_or(0.0),
        network_points: columns.number(row, Column::NetworkPoints).unwrap_or(0.0),
        discount_pct: columns.number(row, Column::Discount).unwrap_or(0.0),
        inactive_cycles: columns.integer(row, Column::InactiveCycles).unwrap_or(0),
        debt: normalize_debt(columns.number(row, Column::Debt)),
        phone: normalize_phone(columns.text(row, Column::Phone).as_deref()),
        bonus_description: columns.text(row, Column::Bonus),
        historical_points,
        sponsor_name: columns.text(row, Column::SponsorName),
        recruits: columns.integer(row, Column::Recruits),
        last_order: columns
            .date_text(row, Column::LastOrder)
            .unwrap_or_else(|| ULTIMA_COMPRA_POR_DEFECTO.to_string()),
    }
}

/// Redondea a centavos.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Deuda no numérica, ausente o negativa queda en 0; el resto se redondea a centavos.
pub fn normalize_debt(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => round_cents(v),
        _ => 0.0,
    }
}

/// Quita una sola vez el prefijo de país al inicio del teléfono.
/// "52" en medio del número no se toca.
pub fn normalize_phone(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(phone) => phone.strip_prefix(PREFIJO_PAIS).unwrap_or(phone).to_string(),
        None => TELEFONO_POR_DEFECTO.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn phone_prefix_is_stripped_once_at_start() {
        assert_eq!(normalize_phone(Some("525512345678")), "5512345678");
        assert_eq!(normalize_phone(Some("52521234")), "521234");
        assert_eq!(normalize_phone(Some("5512345278")), "5512345278");
        assert_eq!(normalize_phone(Some("3352")), "3352");
        assert_eq!(normalize_phone(None), TELEFONO_POR_DEFECTO);
        assert_eq!(normalize_phone(Some("  ")), TELEFONO_POR_DEFECTO);
    }

    #[test]
    fn debt_is_clamped_and_rounded() {
        assert_eq!(normalize_debt(None), 0.0);
        assert_eq!(normalize_debt(Some(-12.0)), 0.0);
        assert_eq!(normalize_debt(Some(f64::NAN)), 0.0);
        assert_eq!(normalize_debt(Some(75.5)), 75.5);
        assert_eq!(normalize_debt(Some(10.126)), 10.13);
        let v = normalize_debt(Some(150.005));
        assert!(v == 150.0 || v == 150.01, "valor inesperado {}", v);
    }

    #[test]
    fn row_without_optional_columns_uses_defaults() {
        let rows = vec![vec![s("Número de Socio")], vec![s("1001")]];
        let table = table_from_rows(&rows);
        assert_eq!(table.len(), 1);
        let r = &table.rows[0];
        assert_eq!(r.member_id, "1001");
        assert_eq!(r.sponsor_id, None);
        assert_eq!(r.display_name, NOMBRE_POR_DEFECTO);
        assert_eq!(r.debt, 0.0);
        assert_eq!(r.inactive_cycles, 0);
        assert_eq!(r.phone, TELEFONO_POR_DEFECTO);
        assert_eq!(r.historical_points, [0.0; 3]);
        assert_eq!(r.recruits, None);
        assert_eq!(r.last_order, "N/A");
        assert_eq!(table.columns, vec![Column::MemberId]);
    }

    #[test]
    fn bad_numbers_coerce_to_zero() {
        let rows = vec![
            vec![s("Número de Socio"), s("Deuda"), s("Catálogos Inactivo")],
            vec![s("1"), s("mucho"), s("varios")],
        ];
        let table = table_from_rows(&rows);
        assert_eq!(table.rows[0].debt, 0.0);
        assert_eq!(table.rows[0].inactive_cycles, 0);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = vec![
            vec![s("Número de Socio")],
            vec![Data::Empty],
            vec![s("2")],
        ];
        let table = table_from_rows(&rows);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].member_id, "2");
    }

    #[test]
    fn empty_sheet_gives_empty_table() {
        assert!(table_from_rows(&[]).is_empty());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path("red.CSV"), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path("red.xlsx"), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path("red"), SourceFormat::Workbook);
    }
}
