//! Validation of text handed to write operations.
//!
//! No escaping exists, so text that contains delimiters is rejected rather
//! than silently changing the table's structure.

use crate::{Error, Result};

/// Checks that `text` can be stored as a single cell.
pub(crate) fn check_cell(text: &str) -> Result<()> {
    if let Some(pos) = text.find([',', '\r', '\n']) {
        return Err(Error::invalid_text(format!(
            "cell text contains a delimiter at byte {pos}"
        )));
    }
    Ok(())
}

/// Checks that `text` can be stored as a single row and returns its cell
/// count.
pub(crate) fn check_row(text: &str) -> Result<u32> {
    if let Some(pos) = text.find(['\r', '\n']) {
        return Err(Error::invalid_text(format!(
            "row text contains a line break at byte {pos}"
        )));
    }
    Ok(text.bytes().filter(|&b| b == b',').count() as u32 + 1)
}

/// Splits CRLF-separated column data into one cell per row.
///
/// A single trailing CRLF is allowed and does not produce an extra cell.
pub(crate) fn split_column(data: &str) -> Result<Vec<&str>> {
    if data.is_empty() {
        return Err(Error::EmptyColumnData);
    }
    let body = data.strip_suffix("\r\n").unwrap_or(data);
    let cells: Vec<&str> = body.split("\r\n").collect();
    for (i, cell) in cells.iter().enumerate() {
        if cell.contains(['\r', '\n']) {
            return Err(Error::invalid_text(format!(
                "column cell {} contains a bare line break",
                i + 1
            )));
        }
        if cell.contains(',') {
            return Err(Error::invalid_text(format!(
                "column cell {} contains a comma",
                i + 1
            )));
        }
    }
    Ok(cells)
}
