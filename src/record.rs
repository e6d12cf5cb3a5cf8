use std::fmt;

use serde::Deserialize;
use time::Date;

/// The four analysis columns. Their header names are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    MaxTemp,
    MinTemp,
    Rainfall,
    Humidity,
}

impl Column {
    /// Projection order, also the column order of the export.
    pub const ALL: [Column; 4] = [
        Column::MaxTemp,
        Column::MinTemp,
        Column::Rainfall,
        Column::Humidity,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::MaxTemp => "Max Temp (°C)",
            Column::MinTemp => "Min Temp (°C)",
            Column::Rainfall => "Rainfall (mm)",
            Column::Humidity => "Humidity (%)",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

pub const DATE_HEADER: &str = "Date";

/// One row of the source table. Any field may be missing.
///
/// Numeric cells that are empty or do not parse are read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(
        rename = "Max Temp (°C)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub max_temp: Option<f64>,
    #[serde(
        rename = "Min Temp (°C)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub min_temp: Option<f64>,
    #[serde(
        rename = "Rainfall (mm)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub rainfall: Option<f64>,
    #[serde(
        rename = "Humidity (%)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub humidity: Option<f64>,
}

impl RawRecord {
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::MaxTemp => self.max_temp,
            Column::MinTemp => self.min_temp,
            Column::Rainfall => self.rainfall,
            Column::Humidity => self.humidity,
        }
    }

    /// `true` when the date and all four measurements are present.
    /// `NaN` and infinities count as missing.
    pub fn is_complete(&self) -> bool {
        self.date.as_deref().is_some_and(|d| !d.is_empty())
            && Column::ALL
                .iter()
                .all(|column| self.value(*column).is_some_and(f64::is_finite))
    }
}

/// A complete, date-parsed observation restricted to the analysis columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanedRecord {
    pub date: Date,
    pub max_temp: f64,
    pub min_temp: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

impl CleanedRecord {
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::MaxTemp => self.max_temp,
            Column::MinTemp => self.min_temp,
            Column::Rainfall => self.rainfall,
            Column::Humidity => self.humidity,
        }
    }

    /// The date as written to the export, `YYYY-MM-DD`.
    pub fn iso_date(&self) -> String {
        let (year, month, day) = self.date.to_calendar_date();
        format!("{year:04}-{:02}-{day:02}", month as u8)
    }
}

impl From<&CleanedRecord> for RawRecord {
    fn from(record: &CleanedRecord) -> Self {
        Self {
            date: Some(record.iso_date()),
            max_temp: Some(record.max_temp),
            min_temp: Some(record.min_temp),
            rainfall: Some(record.rainfall),
            humidity: Some(record.humidity),
        }
    }
}
