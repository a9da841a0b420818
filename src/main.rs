// --- Tablero de red MLM - Archivo principal ---

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mlm_dashboard::render::{render_html, render_json, render_markdown};
use mlm_dashboard::{run_dashboard, DashboardConfig, SourceFormat};

#[derive(Parser)]
#[command(name = "mlm-dashboard")]
#[command(about = "Grafo patrocinador -> recluta y reportes a partir de la planilla de socios", long_about = None)]
struct Cli {
    /// Planilla de socios (.xlsx, .xls, .ods o .csv)
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    #[arg(long, value_enum, default_value_t = OutputKind::Html)]
    output: OutputKind,

    /// Archivo de salida; sin él se escribe en stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Configuración TOML (umbrales, paleta, largo de los reportes)
    #[arg(long, env = "MLM_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    points_threshold: Option<f64>,

    #[arg(long)]
    inactive_threshold: Option<u32>,

    #[arg(long)]
    top: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Auto,
    Workbook,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputKind {
    Html,
    Markdown,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mlm_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("no se pudo cargar la configuración {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(p) = cli.points_threshold {
        config.thresholds.points_threshold = p;
    }
    if let Some(i) = cli.inactive_threshold {
        config.thresholds.inactive_threshold = i;
    }
    if let Some(n) = cli.top {
        config.reports.top_n = n;
    }
    config.validate().context("parámetros inválidos")?;

    let format = match cli.format {
        InputFormat::Auto => SourceFormat::from_path(&cli.file),
        InputFormat::Workbook => SourceFormat::Workbook,
        InputFormat::Csv => SourceFormat::Csv,
    };

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("no se pudo leer {}", cli.file.display()))?;
    let dashboard = run_dashboard(&bytes, format, &config)
        .with_context(|| format!("no se pudo interpretar {}", cli.file.display()))?;

    let rendered = match cli.output {
        OutputKind::Html => render_html(&dashboard),
        OutputKind::Markdown => render_markdown(&dashboard),
        OutputKind::Json => render_json(&dashboard).context("no se pudo serializar el tablero")?,
    };

    match &cli.out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("no se pudo escribir {}", path.display()))?;
            info!(salida = %path.display(), "tablero generado");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes()).context("no se pudo escribir en stdout")?;
        }
    }

    Ok(())
}
