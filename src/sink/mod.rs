use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::extractor::Record;

/// Column order of both the raw and the ranked dataset.
pub const COLUMNS: [&str; 6] = [
    "Description",
    "Price",
    "Rating",
    "Number of Reviews",
    "Scraping Date",
    "URL",
];

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("could not create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `records` to `path` as CSV, replacing anything already there.
pub fn write_records(path: impl AsRef<Path>, records: &[Record]) -> Result<(), SinkError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SinkError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(file, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write the header row and one row per record.
///
/// The header is written even when `records` is empty.
pub fn write_to<W: Write>(writer: W, records: &[Record]) -> Result<(), SinkError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read back a dataset written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>, SinkError> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<Record>, csv::Error>>()
        .map_err(SinkError::from)
}
