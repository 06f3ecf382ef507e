//! Header row enforcement.
//!
//! # Responsibility
//! - Keep row 1 of the employee table equal to `EMPLOYEE_HEADERS`.
//!
//! # Invariants
//! - Only the header row is ever rewritten; data rows keep their positions.
//! - Correct headers cause no writes, so enforcement is idempotent.

use crate::model::employee::{EMPLOYEE_COLUMNS, EMPLOYEE_HEADERS};
use crate::repo::table_repo::{CellStyle, TableStore};
use crate::repo::RepoResult;
use log::info;

pub const HEADER_ROW: usize = 1;
pub const HEADER_BACKGROUND: &str = "#e8eaed";

/// Formatting applied to the header row after a rewrite.
pub fn header_style() -> CellStyle {
    CellStyle {
        bold: true,
        background: Some(HEADER_BACKGROUND.to_string()),
        bordered: true,
    }
}

/// Rewrites the header row when it differs from the canonical labels.
///
/// Returns `true` when a rewrite happened. A mismatch is repaired, never
/// reported; only store faults produce an error.
pub fn ensure_headers<T: TableStore>(table: &T) -> RepoResult<bool> {
    let current = table.read_range(HEADER_ROW, 1, 1, EMPLOYEE_COLUMNS)?;
    let matches = current.first().is_some_and(|cells| {
        cells.len() == EMPLOYEE_COLUMNS
            && cells
                .iter()
                .zip(EMPLOYEE_HEADERS)
                .all(|(cell, header)| cell == header)
    });
    if matches {
        return Ok(false);
    }

    let headers: Vec<String> = EMPLOYEE_HEADERS.iter().map(|h| h.to_string()).collect();
    table.write_range(HEADER_ROW, 1, &[headers])?;
    table.format_range(HEADER_ROW, 1, EMPLOYEE_COLUMNS, &header_style())?;
    info!("event=headers_repaired module=schema status=ok columns={EMPLOYEE_COLUMNS}");
    Ok(true)
}
