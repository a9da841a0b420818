// Estructuras de datos principales

use serde::Serialize;

/// Valor usado cuando la fila no trae número de socio.
pub const ID_DESCONOCIDO: &str = "Desconocido";
pub const NOMBRE_POR_DEFECTO: &str = "Sin nombre";
pub const TIPO_POR_DEFECTO: &str = "Desconocido";
pub const TELEFONO_POR_DEFECTO: &str = "No disponible";
pub const BONO_POR_DEFECTO: &str = "Ninguno";
pub const ULTIMA_COMPRA_POR_DEFECTO: &str = "N/A";

/// Rama de color del socio. Sólo "Member"/"Socio" selecciona la rama `Member`;
/// cualquier otro valor (incluido el ausente) cae en `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label")]
pub enum MemberType {
    Member,
    Other(String),
}

impl MemberType {
    pub fn parse(raw: &str) -> MemberType {
        let trimmed = raw.trim();
        let low = trimmed.to_lowercase();
        if low == "member" || low == "socio" {
            MemberType::Member
        } else if trimmed.is_empty() {
            MemberType::Other(TIPO_POR_DEFECTO.to_string())
        } else {
            MemberType::Other(trimmed.to_string())
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, MemberType::Member)
    }

    pub fn label(&self) -> &str {
        match self {
            MemberType::Member => "Member",
            MemberType::Other(s) => s.as_str(),
        }
    }
}

impl Default for MemberType {
    fn default() -> Self {
        MemberType::Other(TIPO_POR_DEFECTO.to_string())
    }
}

/// Una fila de la planilla ya normalizada.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub member_id: String,
    pub sponsor_id: Option<String>,
    pub display_name: String,
    pub member_type: MemberType,
    pub personal_points: f64,
    pub network_points: f64,
    /// Porcentaje de descuento (0.0 - 100.0) que se muestra en el detalle del nodo.
    pub discount_pct: f64,
    pub inactive_cycles: u32,
    /// Siempre >= 0 y redondeada a centavos.
    pub debt: f64,
    pub phone: String,
    pub bonus_description: Option<String>,
    /// Puntos de los tres periodos anteriores (0 si la columna no existe).
    pub historical_points: [f64; 3],
    pub sponsor_name: Option<String>,
    /// Reclutas informados por la planilla; sin columna se usa el grado de salida del grafo
    pub recruits: Option<u32>,
    pub last_order: String,
}

impl Default for MemberRecord {
    fn default() -> Self {
        MemberRecord {
            member_id: ID_DESCONOCIDO.to_string(),
            sponsor_id: None,
            display_name: NOMBRE_POR_DEFECTO.to_string(),
            member_type: MemberType::default(),
            personal_points: 0.0,
            network_points: 0.0,
            discount_pct: 0.0,
            inactive_cycles: 0,
            debt: 0.0,
            phone: TELEFONO_POR_DEFECTO.to_string(),
            bonus_description: None,
            historical_points: [0.0; 3],
            sponsor_name: None,
            recruits: None,
            last_order: ULTIMA_COMPRA_POR_DEFECTO.to_string(),
        }
    }
}

impl MemberRecord {
    pub fn bonus_or_default(&self) -> &str {
        self.bonus_description.as_deref().unwrap_or(BONO_POR_DEFECTO)
    }
}

/// Columnas lógicas de la plantilla de reporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Column {
    MemberId,
    SponsorId,
    DisplayName,
    MemberType,
    PersonalPoints,
    NetworkPoints,
    Discount,
    InactiveCycles,
    Debt,
    Phone,
    Bonus,
    Historical1,
    Historical2,
    Historical3,
    SponsorName,
    Recruits,
    LastOrder,
}

impl Column {
    pub const ALL: [Column; 17] = [
        Column::MemberId,
        Column::SponsorId,
        Column::DisplayName,
        Column::MemberType,
        Column::PersonalPoints,
        Column::NetworkPoints,
        Column::Discount,
        Column::InactiveCycles,
        Column::Debt,
        Column::Phone,
        Column::Bonus,
        Column::Historical1,
        Column::Historical2,
        Column::Historical3,
        Column::SponsorName,
        Column::Recruits,
        Column::LastOrder,
    ];

    pub const HISTORICAL: [Column; 3] = [Column::Historical1, Column::Historical2, Column::Historical3];
}

/// Tabla normalizada resultante de una carga.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberTable {
    pub rows: Vec<MemberRecord>,
    /// Columnas reconocidas en el encabezado, en orden lógico.
    pub columns: Vec<Column>,
}

impl MemberTable {
    pub fn new(rows: Vec<MemberRecord>, columns: Vec<Column>) -> Self {
        MemberTable { rows, columns }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Cantidad de columnas históricas presentes en la planilla.
    pub fn historical_columns(&self) -> usize {
        Column::HISTORICAL.iter().filter(|c| self.has_column(**c)).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
