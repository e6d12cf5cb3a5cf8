use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::{debug, info, instrument};

use crate::{
    error::CleanError,
    record::{CleanedRecord, RawRecord},
};

const DATE_FORMATS: [&[FormatItem<'static>]; 4] = [
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[year]-[month padding:none]-[day padding:none] [hour]:[minute]:[second]"),
    format_description!("[year]-[month padding:none]-[day padding:none]T[hour]:[minute]:[second]"),
];

/// Decides whether a raw row survives cleaning.
pub trait RowAdmission {
    fn is_admissible(&self, record: &RawRecord) -> bool;
}

/// Default rule: every field must be present, all or nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteRows;

impl RowAdmission for CompleteRows {
    fn is_admissible(&self, record: &RawRecord) -> bool {
        record.is_complete()
    }
}

impl<F> RowAdmission for F
where
    F: Fn(&RawRecord) -> bool,
{
    fn is_admissible(&self, record: &RawRecord) -> bool {
        self(record)
    }
}

/// The canonical record set. Sorted by date, read-only after cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedSet {
    records: Vec<CleanedRecord>,
    dropped: usize,
}

impl CleanedSet {
    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    /// Number of raw rows rejected by the admission rule.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.records.last().map(|r| r.date)
    }

    /// Turn the set back into raw rows, e.g. to run it through cleaning again.
    pub fn to_raw(&self) -> Vec<RawRecord> {
        self.records.iter().map(RawRecord::from).collect()
    }
}

pub fn parse_date(s: &str) -> Option<Date> {
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(s, format).ok())
}

/// Clean with the default all-fields-present rule.
pub fn clean(raw: &[RawRecord]) -> Result<CleanedSet, CleanError> {
    clean_with(raw, &CompleteRows)
}

#[instrument(skip_all, fields(rows = raw.len()))]
pub fn clean_with(
    raw: &[RawRecord],
    admission: &impl RowAdmission,
) -> Result<CleanedSet, CleanError> {
    let mut records = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for (i, record) in raw.iter().enumerate() {
        if !admission.is_admissible(record) {
            dropped += 1;
            continue;
        }
        records.push(project(i + 1, record)?);
    }
    info!("Dropped {dropped} rows with missing values.");

    // Stable, so rows sharing a date keep their source order.
    records.sort_by_key(|r| r.date);
    debug!(kept = records.len(), "Cleaned record set");

    Ok(CleanedSet { records, dropped })
}

fn project(row: usize, record: &RawRecord) -> Result<CleanedRecord, CleanError> {
    let missing = |field| CleanError::IncompleteRow { row, field };

    let value = record.date.as_deref().ok_or_else(|| missing("Date"))?;
    let date = parse_date(value).ok_or_else(|| CleanError::MalformedDate {
        row,
        value: value.to_string(),
    })?;

    Ok(CleanedRecord {
        date,
        max_temp: record.max_temp.ok_or_else(|| missing("Max Temp (°C)"))?,
        min_temp: record.min_temp.ok_or_else(|| missing("Min Temp (°C)"))?,
        rainfall: record.rainfall.ok_or_else(|| missing("Rainfall (mm)"))?,
        humidity: record.humidity.ok_or_else(|| missing("Humidity (%)"))?,
    })
}
