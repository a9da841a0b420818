use thiserror::Error;

/// Fallas al interpretar el archivo subido. Son terminales para la carga:
/// no se intenta recuperar una tabla parcial.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no se pudo abrir el libro de cálculo: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("no se pudo leer la hoja '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("el libro de cálculo no contiene hojas")]
    NoSheets,

    #[error("CSV inválido: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no se pudo leer la configuración {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuración inválida en {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("valor de configuración inválido: {0}")]
    Invalid(String),
}
