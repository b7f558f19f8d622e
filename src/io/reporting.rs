// src/io/reporting.rs

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::ReportError;

/// Writes simulation rows (history records, period summaries) to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/events.csv").
/// * `data` - Rows to serialize, one per line, with a header row.
pub fn write_csv<T: Serialize>(file_path: impl AsRef<Path>, data: &[T]) -> Result<(), ReportError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    info!(rows = data.len(), path = %path.display(), "exported csv");
    Ok(())
}
