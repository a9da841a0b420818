use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::models::{MemberRecord, MemberType};

/// Nivel de color de un nodo. Tres niveles por rama, seis en total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTier {
    MemberHigh,
    MemberInactive,
    MemberBase,
    OtherHigh,
    OtherInactive,
    OtherBase,
}

impl ColorTier {
    pub const ALL: [ColorTier; 6] = [
        ColorTier::MemberHigh,
        ColorTier::MemberInactive,
        ColorTier::MemberBase,
        ColorTier::OtherHigh,
        ColorTier::OtherInactive,
        ColorTier::OtherBase,
    ];
}

/// Regla de color: los puntos se revisan antes que la inactividad, así un
/// socio con muchos puntos queda en el nivel alto aunque esté inactivo.
/// Sólo depende de sus tres argumentos.
pub fn classify(member_type: &MemberType, personal_points: f64, inactive_cycles: u32, thresholds: &Thresholds) -> ColorTier {
    let high = personal_points > thresholds.points_threshold;
    let inactive = inactive_cycles > thresholds.inactive_threshold;
    match (member_type.is_member(), high, inactive) {
        (true, true, _) => ColorTier::MemberHigh,
        (true, false, true) => ColorTier::MemberInactive,
        (true, false, false) => ColorTier::MemberBase,
        (false, true, _) => ColorTier::OtherHigh,
        (false, false, true) => ColorTier::OtherInactive,
        (false, false, false) => ColorTier::OtherBase,
    }
}

/// Texto de detalle (hover) del nodo. `recruits` lo resuelve el builder.
pub fn detail_text(record: &MemberRecord, recruits: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.display_name);
    let _ = writeln!(out, "Tipo: {}", record.member_type.label());
    let _ = writeln!(out, "Descuento: {}%", record.discount_pct);
    let _ = writeln!(out, "Puntos personales: {}", record.personal_points);
    let _ = writeln!(out, "Puntos de red: {}", record.network_points);
    let _ = writeln!(out, "Reclutas: {}", recruits);
    let _ = writeln!(out, "Cashback: {}", record.bonus_or_default());
    let _ = writeln!(out, "Última Compra: {}", record.last_order);
    let _ = write!(out, "Deuda: ${:.2}", record.debt);
    out
}
