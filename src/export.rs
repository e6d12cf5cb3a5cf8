use std::{fs::File, io::Write, path::Path};

use tracing::{info, instrument};

use crate::{
    error::ExportError,
    record::{CleanedRecord, Column, DATE_HEADER},
};

/// Write the cleaned set to `path` as CSV. The date is the leading column.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn export(records: &[CleanedRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::WriteDenied {
        path: path.to_path_buf(),
        source,
    })?;
    export_to_writer(records, file)?;
    info!("Cleaned data exported to {}", path.display());
    Ok(())
}

pub fn export_to_writer(records: &[CleanedRecord], writer: impl Write) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    // Written by hand so that an empty set still gets its header.
    let header = std::iter::once(DATE_HEADER).chain(Column::ALL.iter().map(|c| c.header()));
    writer.write_record(header)?;

    for record in records {
        let mut row = vec![record.iso_date()];
        row.extend(Column::ALL.iter().map(|&c| record.value(c).to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::{cleaner::clean, loader::load_from_reader};

    fn records() -> Vec<CleanedRecord> {
        vec![
            CleanedRecord {
                date: date!(2024 - 01 - 01),
                max_temp: 20.,
                min_temp: 10.,
                rainfall: 0.,
                humidity: 60.,
            },
            CleanedRecord {
                date: date!(2024 - 02 - 01),
                max_temp: 25.5,
                min_temp: 15.,
                rainfall: 5.25,
                humidity: 55.,
            },
        ]
    }

    #[test]
    fn layout() {
        let mut out = Vec::new();
        export_to_writer(&records(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Date,Max Temp (°C),Min Temp (°C),Rainfall (mm),Humidity (%)",
                "2024-01-01,20,10,0,60",
                "2024-02-01,25.5,15,5.25,55",
            ]
        );
    }

    #[test]
    fn empty_set_writes_header_only() {
        let mut out = Vec::new();
        export_to_writer(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn reloads_to_the_same_set() {
        let mut out = Vec::new();
        export_to_writer(&records(), &mut out).unwrap();

        let raw = load_from_reader(out.as_slice()).unwrap();
        let set = clean(&raw).unwrap();
        assert_eq!(set.records(), records().as_slice());
    }

    #[test]
    fn write_denied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export(&records(), &path).unwrap_err();
        assert!(matches!(err, ExportError::WriteDenied { .. }));
    }
}
