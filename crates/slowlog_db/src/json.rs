//! Offline source: slow-log rows dumped as JSON.
//!
//! Accepts either a JSON array of rows or one JSON object per line.

use std::fs;
use std::path::Path;

use slowlog_core::{RawQueryRecord, SlowLogRow};
use tracing::info;

use crate::error::{Result, SourceError};

/// Load and number every row of a JSON dump.
pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<RawQueryRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let records = parse_json(&text)?;
    info!(path = %path.display(), records = records.len(), "loaded slow log dump");
    Ok(records)
}

/// Parse a JSON array or JSON-lines document into records.
pub fn parse_json(text: &str) -> Result<Vec<RawQueryRecord>> {
    if text.trim_start().starts_with('[') {
        let rows: Vec<SlowLogRow> = serde_json::from_str(text)?;
        return Ok(records_from_rows(rows));
    }

    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: SlowLogRow = serde_json::from_str(line).map_err(|source| SourceError::JsonLine {
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(records_from_rows(rows))
}

/// Number rows from 1 and classify them.
pub fn records_from_rows(rows: impl IntoIterator<Item = SlowLogRow>) -> Vec<RawQueryRecord> {
    rows.into_iter()
        .zip(1u64..)
        .map(|(row, id)| RawQueryRecord::from_row(id, row))
        .collect()
}
