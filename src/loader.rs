use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info, instrument};

use crate::{
    error::LoadError,
    record::{Column, RawRecord, DATE_HEADER},
};

/// Read every row of the file at `path`, in file order.
#[instrument]
pub fn load(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_from_reader(file)?;
    info!(rows = records.len(), "Loaded {}", path.display());
    Ok(records)
}

/// Same as [`load`] over any reader. The first line must be the header.
pub fn load_from_reader(reader: impl Read) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    debug!(?headers, "Header row");
    let required = std::iter::once(DATE_HEADER).chain(Column::ALL.iter().map(|c| c.header()));
    for name in required {
        if !headers.iter().any(|h| h == name) {
            return Err(LoadError::MissingColumn(name));
        }
    }

    reader
        .deserialize::<RawRecord>()
        .enumerate()
        .map(|(i, row)| row.map_err(|source| LoadError::BadRow { row: i + 1, source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Max Temp (°C),Min Temp (°C),Rainfall (mm),Humidity (%)";

    #[test]
    fn reads_rows_in_order_with_nulls() {
        let input = format!(
            "{HEADER}\n2024-01-01,20,10,0,60\n2024-01-02,,12,0,65\n2024-02-01, 25 ,15,5,55\n"
        );
        let rows = load_from_reader(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-01"));
        assert_eq!(rows[1].max_temp, None);
        assert_eq!(rows[1].min_temp, Some(12.));
        assert_eq!(rows[2].max_temp, Some(25.));
    }

    #[test]
    fn unparseable_number_is_null() {
        let input = format!("{HEADER}\n2024-01-01,hot,10,0,60\n");
        let rows = load_from_reader(input.as_bytes()).unwrap();
        assert_eq!(rows[0].max_temp, None);
        assert!(!rows[0].is_complete());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let input = "Station,Date,Max Temp (°C),Min Temp (°C),Rainfall (mm),Humidity (%),Wind\n\
                     X,2024-01-01,20,10,0,60,12\n";
        let rows = load_from_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_complete());
    }

    #[test]
    fn missing_column() {
        let input = "Date,Max Temp (°C),Min Temp (°C),Humidity (%)\n2024-01-01,20,10,60\n";
        let err = load_from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Rainfall (mm)")));
    }

    #[test]
    fn header_only() {
        let rows = load_from_reader(HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn source_not_found() {
        let err = load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound { .. }));
    }
}
