//! Metadata file reading.
//!
//! Turns the delimited input file into records. Rows without cells are
//! skipped, every other row keeps its position, so the first non-empty row
//! becomes the template at index 0.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::metadata::record::{MetadataRecord, MintDefaults, RecordError};

/// Errors raised while reading the metadata file. All are fatal at startup.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata file is not valid delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("row on line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: RecordError,
    },
}

/// Read every record of the metadata file at `path`.
pub fn read_metadata_file(
    path: &Path,
    defaults: &MintDefaults,
    targets: bool,
) -> Result<Vec<MetadataRecord>, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_metadata(file, defaults, targets)
}

/// Read records from any source of delimited rows.
pub fn read_metadata<R: Read>(
    input: R,
    defaults: &MintDefaults,
    targets: bool,
) -> Result<Vec<MetadataRecord>, MetadataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.is_empty() {
            continue;
        }
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        let index = records.len();

        let record = MetadataRecord::from_row(index, &cells, defaults, targets)
            .map_err(|source| MetadataError::Row { line, source })?;
        if index > 0 {
            tracing::debug!(index, uri = record.label(), "Read metadata row");
        }
        records.push(record);
    }

    tracing::info!(
        rows = records.len(),
        items = records.len().saturating_sub(1),
        targets,
        "Metadata file read"
    );
    Ok(records)
}
