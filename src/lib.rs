//! Weather observation pipeline: load a CSV of daily observations, drop
//! incomplete rows, compute overall and monthly statistics, then write a
//! cleaned export, a few charts and a markdown summary.

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod series;
pub mod stats;

pub use cleaner::{clean, clean_with, CleanedSet, CompleteRows, RowAdmission};
pub use config::PipelineConfig;
pub use error::{
    ChartError, CleanError, ConfigError, ExportError, LoadError, PipelineError, ReportError,
};
pub use export::export;
pub use loader::load;
pub use pipeline::{Pipeline, RunSummary};
pub use record::{CleanedRecord, Column, RawRecord};
pub use report::{extract_facts, SummaryFacts};
pub use stats::{aggregate, DailyStatistics, MonthlyStatistics};
