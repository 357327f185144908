use std::path::Path;

use log::debug;

use crate::error::{GraphError, Result};

/// One line of the input table: identifier first, then sample cells as text.
pub type RawRow = Vec<String>;

/// Read a comma-separated table without interpreting its first line.
///
/// Rows are kept even when their width differs from the header so that the
/// row filter can report exactly which row is ragged.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let rows = collect_rows(reader)?;
    debug!("read {} rows from {}", rows.len(), path.as_ref().display());
    Ok(rows)
}

fn collect_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    if rows.is_empty() {
        return Err(GraphError::MalformedInput {
            row: 0,
            reason: "input table is empty".to_string(),
        });
    }
    Ok(rows)
}
