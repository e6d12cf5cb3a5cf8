use std::{fs, path::Path};

use time::{Date, Month};
use tracing::{info, instrument};

use crate::{
    error::ReportError,
    record::{CleanedRecord, Column},
    stats::{DailyStatistics, MonthSummary, MonthlyStatistics},
};

/// Mean and maximum of one column, copied from [`DailyStatistics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnFacts {
    pub column: Column,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRainfall {
    pub year: i32,
    pub month: Month,
    pub total: f64,
}

impl PeakRainfall {
    pub fn name(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// Every scalar the narrative report needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFacts {
    pub first_date: Date,
    pub last_date: Date,
    pub columns: Vec<ColumnFacts>,
    pub peak_rainfall: PeakRainfall,
}

impl SummaryFacts {
    /// `January 2024`
    pub fn period_start(&self) -> String {
        month_year(self.first_date)
    }

    pub fn period_end(&self) -> String {
        month_year(self.last_date)
    }

    pub fn column(&self, column: Column) -> Option<&ColumnFacts> {
        self.columns.iter().find(|c| c.column == column)
    }
}

fn month_year(date: Date) -> String {
    format!("{} {}", date.month(), date.year())
}

/// Pick the month with the largest rainfall total. On a tie the earliest month wins.
pub fn peak_rainfall_month(monthly: &MonthlyStatistics) -> Option<&MonthSummary> {
    monthly.months().iter().fold(None, |best, month| match best {
        Some(best) if best.rainfall_total >= month.rainfall_total => Some(best),
        _ => Some(month),
    })
}

#[instrument(skip_all, fields(rows = records.len()))]
pub fn extract_facts(
    records: &[CleanedRecord],
    daily: &DailyStatistics,
    monthly: &MonthlyStatistics,
) -> Result<SummaryFacts, ReportError> {
    let first_date = records.iter().map(|r| r.date).min();
    let last_date = records.iter().map(|r| r.date).max();
    let (Some(first_date), Some(last_date)) = (first_date, last_date) else {
        return Err(ReportError::InsufficientData);
    };

    let peak = peak_rainfall_month(monthly).ok_or(ReportError::InsufficientData)?;

    let columns: Vec<ColumnFacts> = Column::ALL
        .iter()
        .map(|&column| {
            daily
                .get(column)
                .map(|s| ColumnFacts {
                    column,
                    mean: s.mean,
                    max: s.max,
                })
                .ok_or(ReportError::InsufficientData)
        })
        .collect::<Result<_, _>>()?;

    Ok(SummaryFacts {
        first_date,
        last_date,
        columns,
        peak_rainfall: PeakRainfall {
            year: peak.year,
            month: peak.month,
            total: peak.rainfall_total,
        },
    })
}

/// Render the markdown summary. Every number comes straight from `facts`.
pub fn render_markdown(facts: &SummaryFacts) -> String {
    let mut out = String::from("# Weather Data Analysis Report\n\n## 1. Overview\n");
    out.push_str(&format!(
        "This report analyzes local weather data from {} to {}.\n\n",
        facts.period_start(),
        facts.period_end()
    ));

    out.push_str("## 2. Key Statistical Insights\n\n");
    out.push_str(&table_row("Metric", facts, |c| c.column.to_string()));
    out.push_str(&table_row(":---", facts, |_| ":---".to_string()));
    out.push_str(&table_row("**Mean**", facts, |c| format!("{:.2}", c.mean)));
    out.push_str(&table_row("**Max**", facts, |c| format!("{:.2}", c.max)));
    out.push('\n');

    out.push_str("## 3. Aggregation Highlight\n");
    out.push_str(&format!(
        "- **Peak Rainfall Month:** {} showed the highest total rainfall of {:.2} mm.\n",
        facts.peak_rainfall.name(),
        facts.peak_rainfall.total
    ));
    out
}

fn table_row(label: &str, facts: &SummaryFacts, cell: impl Fn(&ColumnFacts) -> String) -> String {
    let cells: String = facts.columns.iter().map(|c| format!(" {} |", cell(c))).collect();
    format!("| {label} |{cells}\n")
}

#[instrument(skip(facts))]
pub fn write_report(facts: &SummaryFacts, path: &Path) -> Result<(), ReportError> {
    fs::write(path, render_markdown(facts)).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Summary report saved to {}", path.display());
    Ok(())
}
