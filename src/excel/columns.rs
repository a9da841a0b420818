use std::collections::HashMap;

use calamine::Data;
use tracing::{debug, warn};

use crate::excel::io::{cell_to_f64, cell_to_string, cell_to_u32, normalize_header};
use crate::models::Column;

/// Encabezados aceptados por columna lógica (ya normalizados con
/// `normalize_header`). El primero es el nombre de la plantilla oficial.
fn aliases(column: Column) -> &'static [&'static str] {
    match column {
        Column::MemberId => &["numerodesocio", "nosocio", "idsocio", "socio", "memberid"],
        Column::SponsorId => &["numerodepatrocinador", "nopatrocinador", "idpatrocinador", "patrocinador", "sponsorid"],
        Column::DisplayName => &["nombredelsocio", "nombre", "nombresocio", "name", "displayname"],
        Column::MemberType => &["tipodesocio", "tipo", "tiposocio", "membertype"],
        Column::PersonalPoints => &["vep", "puntospersonales", "personalpoints", "bp"],
        Column::NetworkPoints => &["vgp", "puntosdered", "networkpoints"],
        Column::Discount => &["descuento", "porcentajededescuento", "discount"],
        Column::InactiveCycles => &["catalogosinactivo", "catalogosinactivos", "inactivecycles"],
        Column::Debt => &["deuda", "saldo", "saldopendiente", "debt"],
        Column::Phone => &["telefono", "celular", "phone"],
        Column::Bonus => &["cashback", "bonificacion", "bono", "bonus"],
        Column::Historical1 => &["vepmes1", "vepanterior1", "historical1"],
        Column::Historical2 => &["vepmes2", "vepanterior2", "historical2"],
        Column::Historical3 => &["vepmes3", "vepanterior3", "historical3"],
        Column::SponsorName => &["nombredelpatrocinador", "nombrepatrocinador", "sponsorname"],
        Column::Recruits => &["reclutas", "numerodereclutas", "recruits"],
        Column::LastOrder => &["ultimacompra", "fechadeultimacompra", "lastorder"],
    }
}

/// Índices de columna resueltos a partir de la fila de encabezados.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    idx: HashMap<Column, usize>,
}

impl ColumnMap {
    pub fn from_headers(header_row: &[Data]) -> ColumnMap {
        let headers: Vec<String> = header_row
            .iter()
            .map(|c| normalize_header(&cell_to_string(c)))
            .collect();

        let mut idx = HashMap::new();
        for column in Column::ALL {
            // Preferir el alias más específico (orden de la lista), luego la primera celda que coincida
            let found = aliases(column)
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias));
            match found {
                Some(i) => {
                    idx.insert(column, i);
                }
                None => debug!(?column, "columna ausente; se usará el valor por defecto"),
            }
        }

        if !idx.contains_key(&Column::MemberId) {
            warn!("la planilla no tiene columna de número de socio; todas las filas usarán el id por defecto");
        }

        ColumnMap { idx }
    }

    pub fn present(&self) -> Vec<Column> {
        Column::ALL.into_iter().filter(|c| self.idx.contains_key(c)).collect()
    }

    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.idx.get(&column).copied()
    }

    fn cell<'a>(&self, row: &'a [Data], column: Column) -> Option<&'a Data> {
        self.index_of(column).and_then(|i| row.get(i))
    }

    /// Texto no vacío de la celda, o `None` si la columna o el valor faltan.
    pub fn text(&self, row: &[Data], column: Column) -> Option<String> {
        self.cell(row, column)
            .map(cell_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Como `text`, pero las fechas de Excel se muestran como `AAAA-MM-DD`.
    pub fn date_text(&self, row: &[Data], column: Column) -> Option<String> {
        match self.cell(row, column) {
            Some(Data::DateTime(dt)) => dt
                .as_datetime()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .or_else(|| self.text(row, column)),
            _ => self.text(row, column),
        }
    }

    pub fn number(&self, row: &[Data], column: Column) -> Option<f64> {
        self.cell(row, column).and_then(cell_to_f64)
    }

    pub fn integer(&self, row: &[Data], column: Column) -> Option<u32> {
        self.cell(row, column).and_then(cell_to_u32)
    }
}
