//! Data series consumed by the chart renderer.
//!
//! Each function only reshapes cleaned records or monthly statistics, so a
//! renderer never needs to compute anything itself.

use time::Date;

use crate::{
    record::{CleanedRecord, Column},
    stats::MonthlyStatistics,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePoint {
    pub date: Date,
    pub max_temp: f64,
    pub min_temp: f64,
}

/// Max and min temperature per date, for the trend chart.
pub fn temperature_trend(records: &[CleanedRecord]) -> Vec<TemperaturePoint> {
    records
        .iter()
        .map(|r| TemperaturePoint {
            date: r.date,
            max_temp: r.max_temp,
            min_temp: r.min_temp,
        })
        .collect()
}

/// Rainfall total per month keyed by `YYYY-MM`, for the bar chart.
pub fn monthly_rainfall(monthly: &MonthlyStatistics) -> Vec<(String, f64)> {
    monthly
        .months()
        .iter()
        .map(|m| (m.key(), m.rainfall_total))
        .collect()
}

/// `(temperature, humidity)` pairs for a scatter chart.
/// `temperature` is either [`Column::MaxTemp`] or [`Column::MinTemp`].
pub fn humidity_scatter(records: &[CleanedRecord], temperature: Column) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.value(temperature), r.humidity))
        .collect()
}
