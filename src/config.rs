//! Configuración del tablero.
//!
//! Todos los campos tienen valor por defecto, de modo que un archivo TOML
//! vacío (o ausente) usa los valores históricos del tablero: umbral de
//! 100 puntos, 3 catálogos inactivos y top 10.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::graph::ColorTier;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub reports: ReportSettings,

    #[serde(default)]
    pub palette: Palette,
}

/// Umbrales de la regla de color. Ambas comparaciones son estrictas (`>`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_points_threshold")]
    pub points_threshold: f64,

    #[serde(default = "default_inactive_threshold")]
    pub inactive_threshold: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            points_threshold: default_points_threshold(),
            inactive_threshold: default_inactive_threshold(),
        }
    }
}

fn default_points_threshold() -> f64 {
    100.0
}

fn default_inactive_threshold() -> u32 {
    3
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Largo del ranking de mejores socios
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Un socio aparece en "inactivos sin deuda" si supera este número de catálogos
    #[serde(default = "default_inactive_report_min")]
    pub inactive_report_min: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_n: default_top_n(),
            inactive_report_min: default_inactive_report_min(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

fn default_inactive_report_min() -> u32 {
    2
}

/// Colores por nivel. Las dos ramas (Member / otros) usan conjuntos disjuntos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_member_high")]
    pub member_high: String,
    #[serde(default = "default_member_inactive")]
    pub member_inactive: String,
    #[serde(default = "default_member_base")]
    pub member_base: String,
    #[serde(default = "default_other_high")]
    pub other_high: String,
    #[serde(default = "default_other_inactive")]
    pub other_inactive: String,
    #[serde(default = "default_other_base")]
    pub other_base: String,
    /// Color de los patrocinadores que sólo aparecen como origen de una arista
    #[serde(default = "default_bare")]
    pub bare: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            member_high: default_member_high(),
            member_inactive: default_member_inactive(),
            member_base: default_member_base(),
            other_high: default_other_high(),
            other_inactive: default_other_inactive(),
            other_base: default_other_base(),
            bare: default_bare(),
        }
    }
}

fn default_member_high() -> String {
    "green".to_string()
}

fn default_member_inactive() -> String {
    "red".to_string()
}

fn default_member_base() -> String {
    "blue".to_string()
}

fn default_other_high() -> String {
    "darkgreen".to_string()
}

fn default_other_inactive() -> String {
    "orange".to_string()
}

fn default_other_base() -> String {
    "lightblue".to_string()
}

fn default_bare() -> String {
    "lightgray".to_string()
}

impl Palette {
    pub fn color_for(&self, tier: ColorTier) -> &str {
        match tier {
            ColorTier::MemberHigh => &self.member_high,
            ColorTier::MemberInactive => &self.member_inactive,
            ColorTier::MemberBase => &self.member_base,
            ColorTier::OtherHigh => &self.other_high,
            ColorTier::OtherInactive => &self.other_inactive,
            ColorTier::OtherBase => &self.other_base,
        }
    }
}

impl DashboardConfig {
    /// Lee y valida un archivo TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config: DashboardConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        config.validate()?;
        info!(path = %shown, "configuración cargada");
        debug!(?config, "configuración efectiva");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.thresholds.points_threshold.is_finite() || self.thresholds.points_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "points_threshold debe ser un número >= 0 (recibido {})",
                self.thresholds.points_threshold
            )));
        }
        if self.reports.top_n == 0 {
            return Err(ConfigError::Invalid("top_n debe ser mayor que 0".to_string()));
        }

        // Seis niveles más el color de los patrocinadores sin fila: todos distintos
        let mut colors: Vec<String> = ColorTier::ALL
            .iter()
            .map(|t| self.palette.color_for(*t).trim().to_lowercase())
            .collect();
        colors.push(self.palette.bare.trim().to_lowercase());
        if colors.iter().any(|c| c.is_empty()) {
            return Err(ConfigError::Invalid("la paleta no admite colores vacíos".to_string()));
        }
        let unique: HashSet<&String> = colors.iter().collect();
        if unique.len() != colors.len() {
            return Err(ConfigError::Invalid(
                "la paleta necesita siete colores distintos (seis niveles y patrocinadores sin fila)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.thresholds.points_threshold, 100.0);
        assert_eq!(config.thresholds.inactive_threshold, 3);
        assert_eq!(config.reports.top_n, 10);
        assert_eq!(config.reports.inactive_report_min, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let raw = r#"
            [thresholds]
            points_threshold = 1000.0

            [palette]
            member_high = "gold"
        "#;
        let config: DashboardConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.thresholds.points_threshold, 1000.0);
        assert_eq!(config.thresholds.inactive_threshold, 3);
        assert_eq!(config.palette.member_high, "gold");
        assert_eq!(config.palette.member_base, "blue");
    }

    #[test]
    fn rejects_zero_top_n() {
        let mut config = DashboardConfig::default();
        config.reports.top_n = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_negative_threshold() {
        let mut config = DashboardConfig::default();
        config.thresholds.points_threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_repeated_palette_colors() {
        let mut config = DashboardConfig::default();
        config.palette.other_base = "Blue".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bare_color_must_differ_from_tiers() {
        let mut config = DashboardConfig::default();
        config.palette.bare = "blue".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn loads_config_file_and_logs_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablero.toml");
        std::fs::write(&path, "[reports]\ntop_n = 5\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.reports.top_n, 5);
    }
}
