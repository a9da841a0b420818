use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use crate::error::LoadError;

/// Convierte un `Data` de calamine a String. Los flotantes enteros se imprimen
/// sin decimales para que ids y teléfonos leídos como número ("5215512345678.0")
/// queden igual que en la planilla.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Interpreta una celda como número. Acepta texto con `$`, separadores de
/// miles y espacios. Devuelve `None` si la celda está vacía o no es numérica.
pub fn cell_to_f64(c: &Data) -> Option<f64> {
    let value = match c {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => parse_number(s),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Interpreta una celda como entero no negativo (trunca decimales).
pub fn cell_to_u32(c: &Data) -> Option<u32> {
    let v = cell_to_f64(c)?;
    if v <= 0.0 {
        return Some(0);
    }
    Some(v.trunc().min(u32::MAX as f64) as u32)
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(*c, '$' | ',' | ' ' | '\u{a0}'))
        .collect();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Normaliza encabezados: minúsculas, sin acentos y sólo alfanuméricos.
/// "Número de Socio" y "numero_de_socio" producen la misma clave.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

pub fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// Lee la primera hoja de un libro (xlsx, xls, xlsb, ods) en memoria.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<Data>>, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let names = workbook.sheet_names().to_owned();
    let primera = names.first().cloned().ok_or(LoadError::NoSheets)?;
    debug!(hoja = %primera, hojas = names.len(), "leyendo primera hoja");

    let range = workbook
        .worksheet_range(&primera)
        .map_err(|source| LoadError::Sheet { sheet: primera.clone(), source })?;

    Ok(range.rows().map(|r| r.to_vec()).collect())
}

/// Decodifica un campo CSV: UTF-8 si es válido; si no, Windows-1252, que es
/// lo que produce Excel al exportar CSV con configuración regional en español.
pub fn decode_field(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(raw);
            decoded.into_owned()
        }
    }
}

/// Lee un CSV como si fuera una hoja: cada campo queda como `Data::String`.
pub fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<Data>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let row: Vec<Data> = record
            .iter()
            .map(|raw| {
                let decoded = decode_field(raw);
                let field = decoded.trim().trim_start_matches('\u{feff}');
                if field.is_empty() {
                    Data::Empty
                } else {
                    Data::String(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_print_without_decimals() {
        assert_eq!(cell_to_string(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_to_string(&Data::Float(5215512345678.0)), "5215512345678");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::String("  Ana ".to_string())), "Ana");
    }

    #[test]
    fn numbers_accept_currency_text() {
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number(" 75.5 "), Some(75.5));
        assert_eq!(parse_number("15%"), Some(15.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn integers_truncate_and_clamp() {
        assert_eq!(cell_to_u32(&Data::Float(4.9)), Some(4));
        assert_eq!(cell_to_u32(&Data::Int(-3)), Some(0));
        assert_eq!(cell_to_u32(&Data::String("x".to_string())), None);
        assert_eq!(cell_to_u32(&Data::Empty), None);
    }

    #[test]
    fn headers_fold_accents_and_spacing() {
        assert_eq!(normalize_header("Número de Socio"), "numerodesocio");
        assert_eq!(normalize_header("numero_de_socio"), "numerodesocio");
        assert_eq!(normalize_header("Catálogos Inactivo"), "catalogosinactivo");
        assert_eq!(normalize_header("Teléfono"), "telefono");
    }

    #[test]
    fn csv_rows_become_string_cells() {
        let rows = read_csv_rows("a,b\n1,\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], Data::String("1".to_string()));
        assert_eq!(rows[1][1], Data::Empty);
    }

    #[test]
    fn windows_1252_csv_is_decoded() {
        let rows = read_csv_rows(b"N\xFAmero de Socio,Nombre del Socio\n1,Jos\xE9\n").unwrap();
        assert_eq!(rows[0][0], Data::String("Número de Socio".to_string()));
        assert_eq!(rows[1][1], Data::String("José".to_string()));
    }

    #[test]
    fn utf8_fields_are_kept_as_is() {
        assert_eq!(decode_field("Teléfono".as_bytes()), "Teléfono");
        assert_eq!(decode_field(b"Tel\xE9fono"), "Teléfono");
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        assert!(read_first_sheet(b"esto no es un libro").is_err());
    }
}
