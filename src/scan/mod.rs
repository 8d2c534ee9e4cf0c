//! Structure scanning.
//!
//! [`scan_shape`] makes one forward pass over a stream and reports how many
//! rows it holds and how many cells its widest row has. It never modifies the
//! stream and restores the caller's cursor when it succeeds.

pub(crate) mod lexer;
pub(crate) mod walker;

use std::ops::ControlFlow;

use crate::store::ByteStore;
use crate::{Error, Result};

pub use lexer::{Action, ByteClass, LexState, Lexer};
pub(crate) use walker::{Anchor, Closer, Event, Walker};

/// Row and column extents of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableShape {
    /// Number of rows, counting an unterminated final row.
    pub rows: u32,
    /// Cell count of the widest row. Rows may have fewer cells.
    pub columns: u32,
}

impl TableShape {
    /// Returns true if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Scans the whole stream and returns its shape.
///
/// The stream is rewound to offset 0 first; a failure to do so is reported as
/// [`Error::SeekFailed`] regardless of how the store phrased it.
pub(crate) fn scan_shape<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
) -> Result<TableShape> {
    let saved = store.position();
    if store.seek(0).is_err() {
        return Err(Error::SeekFailed { offset: 0 });
    }

    let mut shape = TableShape::default();
    walker.walk(store, Anchor::ORIGIN, |event| {
        if let Event::Row { row, cells, .. } = event {
            shape.rows = row;
            shape.columns = shape.columns.max(cells);
        }
        ControlFlow::<()>::Continue(())
    })?;

    store.seek(saved)?;
    log::debug!(
        "scanned {} bytes: {} rows, {} columns",
        store.size(),
        shape.rows,
        shape.columns
    );
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEndings;
    use crate::store::MemoryStore;

    fn shape_of(input: &[u8]) -> TableShape {
        let mut store = MemoryStore::from_bytes(input);
        let mut scratch = [0u8; 32];
        let mut walker = Walker::new(&mut scratch, LineEndings::CrLf, false);
        scan_shape(&mut store, &mut walker).unwrap()
    }

    #[test]
    fn test_scan_reference_table() {
        assert_eq!(
            shape_of(b"a,b\r\nc\r\nd,e,f\r\n"),
            TableShape {
                rows: 3,
                columns: 3
            }
        );
    }

    #[test]
    fn test_scan_empty() {
        let shape = shape_of(b"");
        assert!(shape.is_empty());
        assert_eq!(shape.columns, 0);
    }

    #[test]
    fn test_scan_unterminated_last_row() {
        assert_eq!(
            shape_of(b"a\r\nb,c,d"),
            TableShape {
                rows: 2,
                columns: 3
            }
        );
    }

    #[test]
    fn test_scan_lone_cr_is_content() {
        assert_eq!(
            shape_of(b"a\rb,c\r\n"),
            TableShape {
                rows: 1,
                columns: 2
            }
        );
    }

    #[test]
    fn test_scan_empty_rows_have_one_cell() {
        assert_eq!(
            shape_of(b"\r\n\r\n"),
            TableShape {
                rows: 2,
                columns: 1
            }
        );
    }

    #[test]
    fn test_scan_restores_cursor() {
        let mut store = MemoryStore::from_bytes(b"a,b\r\nc\r\n");
        store.seek(4).unwrap();
        let mut scratch = [0u8; 3];
        let mut walker = Walker::new(&mut scratch, LineEndings::CrLf, false);
        scan_shape(&mut store, &mut walker).unwrap();
        assert_eq!(store.position(), 4);
    }
}
