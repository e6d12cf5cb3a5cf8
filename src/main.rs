use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use weather_report::{LoadError, Pipeline, PipelineConfig, PipelineError};

#[derive(Parser)]
#[command(name = "weather-report")]
#[command(about = "Clean daily weather observations and summarize them", long_about = None)]
struct Cli {
    /// TOML file with `source_path`, `export_path`, `report_path` and `chart_dir`
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file with the raw observations
    #[arg(long)]
    source: Option<PathBuf>,

    /// Where to write the cleaned CSV
    #[arg(long)]
    export: Option<PathBuf>,

    /// Where to write the markdown summary
    #[arg(long)]
    report: Option<PathBuf>,

    /// Directory receiving the charts
    #[arg(long, conflicts_with = "no_charts")]
    chart_dir: Option<PathBuf>,

    /// Do not render any chart
    #[arg(long)]
    no_charts: bool,
}

impl Cli {
    fn into_config(self) -> miette::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_toml_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(source) = self.source {
            config.source_path = source;
        }
        if let Some(export) = self.export {
            config.export_path = export;
        }
        if let Some(report) = self.report {
            config.report_path = report;
        }
        if let Some(dir) = self.chart_dir {
            config.chart_dir = Some(dir);
        }
        if self.no_charts {
            config.chart_dir = None;
        }
        Ok(config)
    }
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;

    match Pipeline::new(config).run() {
        Ok(summary) => {
            for artifact in &summary.artifacts {
                info!("Wrote {}", artifact.display());
            }
            info!("Weather data report completed successfully.");
            Ok(())
        }
        Err(PipelineError::Load(e @ LoadError::SourceNotFound { .. })) => {
            error!("{e}");
            info!("Project terminated due to data loading errors.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
