use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    charts,
    cleaner::{self, CleanedSet, CompleteRows, RowAdmission},
    config::PipelineConfig,
    error::{PipelineError, ReportError},
    export, loader,
    report::{self, SummaryFacts},
    stats::{self, DailyStatistics, MonthlyStatistics},
};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub loaded: usize,
    pub cleaned: CleanedSet,
    pub daily: DailyStatistics,
    pub monthly: MonthlyStatistics,
    /// `None` when there was no data to report on.
    pub facts: Option<SummaryFacts>,
    pub artifacts: Vec<PathBuf>,
}

/// Runs every stage in order, halting at the first fatal error.
pub struct Pipeline<A = CompleteRows> {
    config: PipelineConfig,
    admission: A,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            admission: CompleteRows,
        }
    }
}

impl<A: RowAdmission> Pipeline<A> {
    /// Replace the row admission rule.
    pub fn with_admission<B: RowAdmission>(self, admission: B) -> Pipeline<B> {
        Pipeline {
            config: self.config,
            admission,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[instrument(skip(self), fields(source = %self.config.source_path.display()))]
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let raw = loader::load(&self.config.source_path)?;
        let loaded = raw.len();

        let cleaned = cleaner::clean_with(&raw, &self.admission)?;
        drop(raw);
        if cleaned.is_empty() {
            warn!("No record survived cleaning");
        }

        let (daily, monthly) = stats::aggregate(cleaned.records());
        let mut artifacts = Vec::new();

        match &self.config.chart_dir {
            Some(_) if cleaned.is_empty() => warn!("Nothing to plot, skipping charts"),
            Some(dir) => artifacts.extend(charts::render_all(cleaned.records(), &monthly, dir)?),
            None => (),
        }

        export::export(cleaned.records(), &self.config.export_path)?;
        artifacts.push(self.config.export_path.clone());

        let facts = match report::extract_facts(cleaned.records(), &daily, &monthly) {
            Ok(facts) => {
                report::write_report(&facts, &self.config.report_path)?;
                artifacts.push(self.config.report_path.clone());
                Some(facts)
            }
            Err(ReportError::InsufficientData) => {
                warn!("Summary report unavailable: insufficient data");
                None
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            loaded,
            kept = cleaned.len(),
            dropped = cleaned.dropped(),
            "Weather data pipeline completed"
        );

        Ok(RunSummary {
            loaded,
            cleaned,
            daily,
            monthly,
            facts,
            artifacts,
        })
    }
}
