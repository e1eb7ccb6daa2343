/// Warning-table archive: one JSON object per line, each a `WarningRow`
/// stamped with the time of the snapshot it came from.
///
/// The archive is append-only. Reloading it yields the severity
/// observations that `analysis::transitions` works on.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::transitions::SeverityObservation;
use crate::model::FloodDataError;
use crate::warnings::{WarningRow, WarningTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub snapshot_time: DateTime<Utc>,
    #[serde(flatten)]
    pub row: WarningRow,
}

impl HistoryRow {
    pub fn observation(&self) -> SeverityObservation {
        SeverityObservation {
            flood_id: self.row.key().to_string(),
            severity: self.row.severity,
            snapshot_time: self.snapshot_time,
        }
    }
}

/// Stamps every row of a table with the snapshot time.
pub fn stamp(table: &WarningTable, snapshot_time: DateTime<Utc>) -> Vec<HistoryRow> {
    table
        .rows
        .iter()
        .map(|row| HistoryRow { snapshot_time, row: row.clone() })
        .collect()
}

/// Appends rows to the archive, creating it (and its directory) if needed.
/// Returns the number of rows written.
pub fn append_history(path: &Path, rows: &[HistoryRow]) -> Result<usize, FloodDataError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(rows.len())
}

/// Loads every row in the archive, in file order.
///
/// A missing archive is empty. Blank lines are skipped; any other line
/// that does not parse fails the load with its line number.
pub fn load_history(path: &Path) -> Result<Vec<HistoryRow>, FloodDataError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(fs::File::open(path)?);

    let mut rows = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|e| {
            FloodDataError::Parse(format!("{} line {}: {}", path.display(), n + 1, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn observations(rows: &[HistoryRow]) -> Vec<SeverityObservation> {
    rows.iter().map(HistoryRow::observation).collect()
}
