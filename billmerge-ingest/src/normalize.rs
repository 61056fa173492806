//! Cell cleanup applied to every parsed export table.

use crate::types::RawTable;

/// Currency symbol some providers prefix to amounts
pub const CURRENCY_MARKER: char = '¥';

/// Trim whitespace, then strip the currency marker from both ends.
pub fn normalize_cell(cell: &str) -> String {
    cell.trim().trim_matches(CURRENCY_MARKER).to_string()
}

/// Trim every header and normalize every cell.
pub fn normalize(table: RawTable) -> RawTable {
    RawTable {
        headers: table
            .headers
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        rows: table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| normalize_cell(cell)).collect())
            .collect(),
    }
}
