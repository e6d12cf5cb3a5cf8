use std::collections::BTreeMap;

use time::Month;
use tracing::{debug, instrument};

use crate::record::{CleanedRecord, Column};

/// Descriptive statistics of one column over every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation. `None` with fewer than two rows.
    pub std_dev: Option<f64>,
}

impl ColumnSummary {
    /// `None` on an empty series.
    pub fn compute(column: Column, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let n = count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Rounding in the sum can push the mean just past the extremes.
        let mean = (values.iter().sum::<f64>() / n).clamp(min, max);

        let std_dev = (count >= 2).then(|| {
            let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (n - 1.)).sqrt()
        });

        Some(Self {
            column,
            count,
            mean,
            min,
            max,
            std_dev,
        })
    }
}

/// Overall statistics over the full per-row series, one summary per column.
///
/// These are not grouped by calendar day: each row already is one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyStatistics {
    summaries: Vec<ColumnSummary>,
}

impl DailyStatistics {
    pub fn compute(records: &[CleanedRecord]) -> Self {
        let summaries = Column::ALL
            .iter()
            .filter_map(|&column| {
                let values: Vec<f64> = records.iter().map(|r| r.value(column)).collect();
                ColumnSummary::compute(column, &values)
            })
            .collect();
        Self { summaries }
    }

    pub fn get(&self, column: Column) -> Option<&ColumnSummary> {
        self.summaries.iter().find(|s| s.column == column)
    }

    pub fn summaries(&self) -> &[ColumnSummary] {
        &self.summaries
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Aggregates of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: Month,
    pub days: usize,
    pub max_temp_mean: f64,
    pub max_temp_min: f64,
    pub max_temp_max: f64,
    pub rainfall_total: f64,
    pub humidity_mean: f64,
}

impl MonthSummary {
    /// `YYYY-MM`, as used for chart labels.
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month as u8)
    }

    /// `June 2024`
    pub fn name(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// One summary per month present in the data, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyStatistics {
    months: Vec<MonthSummary>,
}

impl MonthlyStatistics {
    pub fn compute(records: &[CleanedRecord]) -> Self {
        let mut groups: BTreeMap<(i32, u8), Vec<&CleanedRecord>> = BTreeMap::new();
        for record in records {
            let key = (record.date.year(), record.date.month() as u8);
            groups.entry(key).or_default().push(record);
        }

        let months = groups
            .into_values()
            .map(|days| {
                let first = days[0].date;
                let n = days.len() as f64;
                let max_temps = days.iter().map(|r| r.max_temp);
                let max_temp_min = max_temps.clone().fold(f64::INFINITY, f64::min);
                let max_temp_max = max_temps.clone().fold(f64::NEG_INFINITY, f64::max);
                let max_temp_mean = max_temps.sum::<f64>() / n;
                MonthSummary {
                    year: first.year(),
                    month: first.month(),
                    days: days.len(),
                    max_temp_mean: max_temp_mean.clamp(max_temp_min, max_temp_max),
                    max_temp_min,
                    max_temp_max,
                    rainfall_total: days.iter().map(|r| r.rainfall).sum(),
                    humidity_mean: days.iter().map(|r| r.humidity).sum::<f64>() / n,
                }
            })
            .collect();

        Self { months }
    }

    pub fn months(&self) -> &[MonthSummary] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Compute both the overall and the monthly statistics.
#[instrument(skip_all, fields(rows = records.len()))]
pub fn aggregate(records: &[CleanedRecord]) -> (DailyStatistics, MonthlyStatistics) {
    let daily = DailyStatistics::compute(records);
    let monthly = MonthlyStatistics::compute(records);
    debug!(months = monthly.months().len(), "Aggregated");
    (daily, monthly)
}

#[cfg(test)]
mod tests {
    use time::{macros::date, Date};

    use super::*;

    fn record(
        date: Date,
        max_temp: f64,
        min_temp: f64,
        rainfall: f64,
        humidity: f64,
    ) -> CleanedRecord {
        CleanedRecord {
            date,
            max_temp,
            min_temp,
            rainfall,
            humidity,
        }
    }

    fn sample() -> Vec<CleanedRecord> {
        vec![
            record(date!(2024 - 01 - 01), 20., 10., 0., 60.),
            record(date!(2024 - 01 - 15), 22., 11., 3.5, 70.),
            record(date!(2024 - 02 - 01), 25., 15., 5., 55.),
            record(date!(2024 - 02 - 20), 27., 14., 1.5, 50.),
            record(date!(2025 - 01 - 03), 18., 8., 12., 80.),
        ]
    }

    #[test]
    fn column_summary() {
        let values = [2., 4., 4., 4., 5., 5., 7., 9.];
        let summary = ColumnSummary::compute(Column::MaxTemp, &values).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, 5.);
        assert_eq!(summary.min, 2.);
        assert_eq!(summary.max, 9.);
        // sum of squares is 32, over n - 1 = 7
        let expected = (32f64 / 7.).sqrt();
        assert!((summary.std_dev.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn single_row_has_no_std_dev() {
        let summary = ColumnSummary::compute(Column::Rainfall, &[3.]).unwrap();
        assert_eq!(summary.mean, 3.);
        assert_eq!(summary.std_dev, None);
    }

    #[test]
    fn mean_stays_within_bounds_on_repeated_decimals() {
        for value in [0.1, 0.7, 1.1, 33.3] {
            let summary = ColumnSummary::compute(Column::Rainfall, &[value; 3]).unwrap();
            assert!(summary.min <= summary.mean && summary.mean <= summary.max, "{summary:?}");
            assert_eq!(summary.mean, value);
        }

        let records: Vec<_> = (1..=3)
            .map(|day| {
                let date = Date::from_calendar_date(2024, Month::May, day).unwrap();
                record(date, 0.1, 0.1, 0.1, 0.1)
            })
            .collect();
        let (daily, monthly) = aggregate(&records);
        for summary in daily.summaries() {
            assert!(summary.min <= summary.mean && summary.mean <= summary.max, "{summary:?}");
        }
        let may = monthly.months()[0];
        assert!(may.max_temp_min <= may.max_temp_mean && may.max_temp_mean <= may.max_temp_max);
    }

    #[test]
    fn daily_bounds_hold() {
        let daily = DailyStatistics::compute(&sample());
        assert_eq!(daily.summaries().len(), 4);
        for summary in daily.summaries() {
            assert!(summary.min <= summary.mean && summary.mean <= summary.max, "{summary:?}");
        }
        assert_eq!(daily.get(Column::Humidity).unwrap().max, 80.);
    }

    #[test]
    fn monthly_groups_are_chronological() {
        let monthly = MonthlyStatistics::compute(&sample());
        let keys: Vec<_> = monthly.months().iter().map(MonthSummary::key).collect();
        assert_eq!(keys, ["2024-01", "2024-02", "2025-01"]);

        let january = monthly.months()[0];
        assert_eq!(january.days, 2);
        assert_eq!(january.max_temp_mean, 21.);
        assert_eq!(january.max_temp_min, 20.);
        assert_eq!(january.max_temp_max, 22.);
        assert_eq!(january.rainfall_total, 3.5);
        assert_eq!(january.humidity_mean, 65.);
        assert_eq!(january.name(), "January 2024");
    }

    #[test]
    fn monthly_rainfall_adds_up() {
        let records = sample();
        let (_, monthly) = aggregate(&records);
        let monthly_sum: f64 = monthly.months().iter().map(|m| m.rainfall_total).sum();
        let overall: f64 = records.iter().map(|r| r.rainfall).sum();
        assert!((monthly_sum - overall).abs() < 1e-9);
    }

    #[test]
    fn empty_input() {
        let (daily, monthly) = aggregate(&[]);
        assert!(daily.is_empty());
        assert!(daily.get(Column::MaxTemp).is_none());
        assert!(monthly.is_empty());
    }
}
