use std::sync::Arc;

use mlm_dashboard::excel::{load_table, load_table_cached, SourceFormat, TableCache};
use mlm_dashboard::models::{Column, MemberType};
use mlm_dashboard::LoadError;
use rust_xlsxwriter::Workbook;

enum Cell<'a> {
    S(&'a str),
    N(f64),
    Blank,
}

fn xlsx(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::S(s) => {
                        sheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Cell::N(n) => {
                        sheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn template_header() -> Vec<Cell<'static>> {
    vec![
        Cell::S("Número de Socio"),
        Cell::S("Número de Patrocinador"),
        Cell::S("Nombre del Socio"),
        Cell::S("Tipo de Socio"),
        Cell::S("VEP"),
        Cell::S("Catálogos Inactivo"),
        Cell::S("Deuda"),
        Cell::S("Teléfono"),
    ]
}

#[test]
fn reads_numeric_ids_and_phones_from_workbook() {
    let bytes = xlsx(&[
        template_header(),
        vec![
            Cell::N(1001.0),
            Cell::Blank,
            Cell::S("Ana"),
            Cell::S("Member"),
            Cell::N(150.0),
            Cell::N(0.0),
            Cell::N(0.0),
            Cell::N(525512345678.0),
        ],
        vec![
            Cell::N(1002.0),
            Cell::N(1001.0),
            Cell::S("Beto"),
            Cell::S("Cliente"),
            Cell::N(20.0),
            Cell::N(4.0),
            Cell::N(150.005),
            Cell::S("5512345278"),
        ],
    ]);

    let table = load_table(&bytes, SourceFormat::Workbook).unwrap();
    assert_eq!(table.len(), 2);

    let ana = &table.rows[0];
    assert_eq!(ana.member_id, "1001");
    assert_eq!(ana.sponsor_id, None);
    assert_eq!(ana.member_type, MemberType::Member);
    assert_eq!(ana.phone, "5512345678");

    let beto = &table.rows[1];
    assert_eq!(beto.sponsor_id.as_deref(), Some("1001"));
    assert_eq!(beto.member_type, MemberType::Other("Cliente".to_string()));
    assert_eq!(beto.inactive_cycles, 4);
    assert!(beto.debt == 150.0 || beto.debt == 150.01);
    assert_eq!(beto.phone, "5512345278");

    assert!(table.has_column(Column::Phone));
    assert!(!table.has_column(Column::Bonus));
    assert_eq!(table.historical_columns(), 0);
}

#[test]
fn missing_columns_fall_back_to_defaults() {
    let bytes = xlsx(&[
        vec![Cell::S("Número de Socio"), Cell::S("Nombre del Socio")],
        vec![Cell::N(7.0), Cell::S("Carla")],
    ]);
    let table = load_table(&bytes, SourceFormat::Workbook).unwrap();
    let carla = &table.rows[0];
    assert_eq!(carla.debt, 0.0);
    assert_eq!(carla.inactive_cycles, 0);
    assert_eq!(carla.personal_points, 0.0);
    assert_eq!(carla.phone, "No disponible");
    assert_eq!(carla.bonus_or_default(), "Ninguno");
    assert_eq!(carla.member_type, MemberType::Other("Desconocido".to_string()));
}

#[test]
fn csv_uploads_use_same_column_contract() {
    let csv = "Número de Socio,Número de Patrocinador,Nombre del Socio,Deuda,Teléfono,VEP Mes 1,VEP Mes 2\n\
               1,,Ana,\"$1,200.50\",5233445566,10,20\n\
               2,1,Beto,-5,,30,\n";
    let table = load_table(csv.as_bytes(), SourceFormat::Csv).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].debt, 1200.5);
    assert_eq!(table.rows[0].phone, "33445566");
    assert_eq!(table.rows[0].historical_points, [10.0, 20.0, 0.0]);
    assert_eq!(table.rows[1].debt, 0.0);
    assert_eq!(table.rows[1].phone, "No disponible");
    assert_eq!(table.historical_columns(), 2);
}

#[test]
fn malformed_workbook_fails_fast() {
    let result = load_table(b"PK\x03\x04 no es un zip", SourceFormat::Workbook);
    assert!(matches!(result, Err(LoadError::Workbook(_))));
}

#[test]
fn ragged_csv_is_tolerated() {
    let csv = "Número de Socio,Nombre del Socio,Deuda\n1\n2,Beto,10,extra\n";
    let table = load_table(csv.as_bytes(), SourceFormat::Csv).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].display_name, "Sin nombre");
    assert_eq!(table.rows[1].debt, 10.0);
}

#[test]
fn cache_reuses_parsed_workbook() {
    let cache = TableCache::new();
    let bytes = xlsx(&[vec![Cell::S("Número de Socio")], vec![Cell::N(1.0)]]);
    let a = cache.get_or_load(&bytes, SourceFormat::Workbook).unwrap();
    let b = cache.get_or_load(&bytes, SourceFormat::Workbook).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let g1 = load_table_cached(&bytes, SourceFormat::Workbook).unwrap();
    let g2 = load_table_cached(&bytes, SourceFormat::Workbook).unwrap();
    assert!(Arc::ptr_eq(&g1, &g2));
    assert_eq!(*g1, *a);
}

#[test]
fn windows_1252_csv_export_is_accepted() {
    // Excel en español exporta CSV en Windows-1252: "Número" llega con el byte 0xFA
    let csv = b"N\xFAmero de Socio,Nombre del Socio,Tel\xE9fono\n1,Jos\xE9,525511111111\n";
    let table = load_table(csv, SourceFormat::Csv).unwrap();
    assert!(table.has_column(Column::MemberId));
    assert!(table.has_column(Column::Phone));
    assert_eq!(table.rows[0].member_id, "1");
    assert_eq!(table.rows[0].display_name, "José");
    assert_eq!(table.rows[0].phone, "5511111111");
}
