use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Data file not found at {}", path.display())]
    #[diagnostic(
        code(weather_report::source_not_found),
        help("check the `source_path` setting or pass `--source`")
    )]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Missing column `{0}` in header")]
    #[diagnostic(code(weather_report::missing_column))]
    MissingColumn(&'static str),
    #[error("Bad row {row}: {source}")]
    #[diagnostic(code(weather_report::bad_row))]
    BadRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    #[diagnostic(code(weather_report::csv))]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, Diagnostic)]
pub enum CleanError {
    #[error("Malformed date `{value}` in row {row}")]
    #[diagnostic(
        code(weather_report::malformed_date),
        help("dates must be written as YYYY-MM-DD or YYYY/MM/DD, optionally followed by a time")
    )]
    MalformedDate { row: usize, value: String },
    #[error("Row {row} was admitted but is missing `{field}`")]
    #[diagnostic(code(weather_report::incomplete_row))]
    IncompleteRow { row: usize, field: &'static str },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("Insufficient data to write a report")]
    #[diagnostic(
        code(weather_report::insufficient_data),
        help("no record survived cleaning")
    )]
    InsufficientData,
    #[error("Could not write report to {}", path.display())]
    #[diagnostic(code(weather_report::report_write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("Could not write export to {}", path.display())]
    #[diagnostic(code(weather_report::write_denied))]
    WriteDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    #[diagnostic(code(weather_report::csv))]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ChartError {
    #[error("Could not create chart directory {}", path.display())]
    #[diagnostic(code(weather_report::chart_dir))]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Drawing failed: {0}")]
    #[diagnostic(code(weather_report::draw))]
    Draw(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(e.to_string())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Could not read config file {}", path.display())]
    #[diagnostic(code(weather_report::config_read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Bad config file: {0}")]
    #[diagnostic(code(weather_report::config_parse))]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Clean(#[from] CleanError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Chart(#[from] ChartError),
}
