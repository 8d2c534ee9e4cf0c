//! Span location.
//!
//! A [`Span`] is the half-open byte interval `[start, end)` of a row or a
//! cell. Spans are never cached: each lookup walks the stream again from a
//! known row start (the stream origin unless the caller already knows a
//! later one), so they stay correct after any mutation.

use std::ops::ControlFlow;

use crate::Result;
use crate::scan::{Anchor, Closer, Event, Walker};
use crate::store::ByteStore;

/// Half-open byte interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    /// First byte.
    pub start: u32,
    /// One past the last byte.
    pub end: u32,
}

impl Span {
    /// Creates a span. `start` must not exceed `end`.
    pub const fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Zero-length span at `at`.
    pub const fn point(at: u32) -> Self {
        Self { start: at, end: at }
    }

    /// Number of bytes covered.
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true for a zero-length span.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Where a row lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowLocation {
    /// Row bytes including the terminator.
    pub span: Span,
    /// Cells in the row.
    pub cells: u32,
    /// Terminator length; 0 for an unterminated final row.
    pub terminator: u32,
}

impl RowLocation {
    /// Offset of the terminator, or the row end when there is none.
    pub fn content_end(&self) -> u32 {
        self.span.end - self.terminator
    }
}

/// Where a cell lives, or where it would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellLocation {
    /// The cell exists.
    Found { span: Span, closer: Closer },
    /// The row is too short. `at` is the zero-length point before the row's
    /// terminator where filler commas must go; `cells` is the row's current
    /// cell count.
    Missing { at: u32, cells: u32 },
}

/// Result of a lookup: the row, and the cell when one was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    pub row: RowLocation,
    pub cell: Option<CellLocation>,
}

/// Finds `row` (and optionally `column` within it), walking from `from`.
///
/// `from` must be the start of a row at or before `row`. Returns `None` when
/// the stream ends before the row.
pub(crate) fn locate<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
    from: Anchor,
    row: u32,
    column: Option<u32>,
) -> Result<Option<Located>> {
    debug_assert!(from.row <= row);
    let mut found_cell = None;
    walker.walk(store, from, |event| match event {
        Event::Cell {
            row: r,
            column: c,
            span,
            closer,
        } if r == row && Some(c) == column => {
            found_cell = Some(CellLocation::Found { span, closer });
            ControlFlow::Continue(())
        }
        Event::Row {
            row: r,
            cells,
            span,
            terminator,
        } if r == row => {
            let location = RowLocation {
                span,
                cells,
                terminator,
            };
            let cell = column.map(|_| {
                found_cell.unwrap_or(CellLocation::Missing {
                    at: location.content_end(),
                    cells,
                })
            });
            ControlFlow::Break(Located {
                row: location,
                cell,
            })
        }
        _ => ControlFlow::Continue(()),
    })
}

/// Span of `row` including its terminator.
pub(crate) fn row_span<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
    row: u32,
) -> Result<Option<RowLocation>> {
    Ok(locate(store, walker, Anchor::ORIGIN, row, None)?.map(|l| l.row))
}

/// Span of cell `(row, column)`, or the padding point if the row is short.
pub(crate) fn cell_span<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
    row: u32,
    column: u32,
) -> Result<Option<CellLocation>> {
    Ok(locate(store, walker, Anchor::ORIGIN, row, Some(column))?.and_then(|l| l.cell))
}
