use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use super::record::DriverSeasonRecord;
use super::validation::{validate_schema, REQUIRED_COLUMNS};
use crate::error::{PipelineError, Result};

/// Parsed upload: the header as written plus one record per data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTable {
    pub columns: Vec<String>,
    pub records: Vec<DriverSeasonRecord>,
}

impl SeasonTable {
    pub fn from_records(records: Vec<DriverSeasonRecord>) -> Self {
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a CSV upload from disk.
pub fn load_table(path: &Path, max_rows: usize) -> Result<SeasonTable> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(BufReader::new(file), max_rows)?;
    debug!(path = %path.display(), rows = table.len(), "read upload");
    Ok(table)
}

/// Parse CSV with a header row.
///
/// The header is checked before any row is parsed. Columns beyond the required
/// ones are ignored and row order is kept. Reading stops as soon as the upload
/// goes past `max_rows`.
pub fn read_table<R: Read>(reader: R, max_rows: usize) -> Result<SeasonTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| PipelineError::InvalidRecord {
            row: 0,
            reason: format!("unreadable header: {}", e),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    validate_schema(&columns, &REQUIRED_COLUMNS)
        .map_err(|missing| PipelineError::SchemaValidation { missing })?;

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<DriverSeasonRecord>().enumerate() {
        if i >= max_rows {
            return Err(PipelineError::TooManyRows { limit: max_rows });
        }
        let row = i + 1;
        let record = result.map_err(|e| PipelineError::InvalidRecord {
            row,
            reason: e.to_string(),
        })?;
        record
            .check()
            .map_err(|reason| PipelineError::InvalidRecord { row, reason })?;
        records.push(record);
    }

    Ok(SeasonTable { columns, records })
}
