//! Stream-level algorithms behind the table accessors.
//!
//! A [`Session`] pairs the attached store with a walker over the table's
//! scratch window for the duration of one accessor call. Range checks and
//! count bookkeeping stay in [`CsvTable`](super::CsvTable); everything here
//! only talks to the stream.

use crate::locate::{self, CellLocation, Span};
use crate::scan::{self, Anchor, Closer, TableShape, Walker};
use crate::splice::{self, CRLF, SpliceDelta};
use crate::store::ByteStore;
use crate::{Error, Result};

/// What a column write did to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ColumnWrite {
    /// Rows whose existing cell was replaced or padded.
    pub rows_updated: u32,
    /// Rows appended past the old end of the stream.
    pub rows_appended: u32,
}

pub(crate) struct Session<'a, S: ByteStore + ?Sized> {
    pub store: &'a mut S,
    pub walker: Walker<'a>,
}

impl<S: ByteStore + ?Sized> Session<'_, S> {
    pub fn scan(&mut self) -> Result<TableShape> {
        scan::scan_shape(self.store, &mut self.walker)
    }

    fn read_text(&mut self, span: Span, out: &mut Vec<u8>) -> Result<()> {
        self.walker.read_span(self.store, span, out)
    }

    pub fn read_row(&mut self, row: u32) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(location) = locate::row_span(self.store, &mut self.walker, row)? {
            self.read_text(location.span, &mut out)?;
        }
        Ok(out)
    }

    pub fn read_item(&mut self, row: u32, column: u32) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(CellLocation::Found { span, .. }) =
            locate::cell_span(self.store, &mut self.walker, row, column)?
        {
            self.read_text(span, &mut out)?;
        }
        Ok(out)
    }

    /// Collects cell `column` of every row, each followed by CRLF. Rows too
    /// short to have the cell contribute an empty line.
    pub fn read_column(&mut self, column: u32) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut anchor = Anchor::ORIGIN;
        while let Some(located) =
            locate::locate(self.store, &mut self.walker, anchor, anchor.row, Some(column))?
        {
            if let Some(CellLocation::Found { span, .. }) = located.cell {
                self.read_text(span, &mut out)?;
            }
            out.extend_from_slice(CRLF);
            anchor = Anchor {
                offset: located.row.span.end,
                row: anchor.row + 1,
            };
        }
        Ok(out)
    }

    /// Replaces row `row` with `text` plus CRLF, appending rows first if the
    /// stream is shorter. Returns the number of rows appended.
    pub fn write_row(&mut self, row: u32, text: &str) -> Result<u32> {
        let appended = splice::ensure_row(self.store, &mut self.walker, row)?;
        let location = locate::row_span(self.store, &mut self.walker, row)?
            .ok_or_else(|| Error::store("write", format!("row {row} missing after extension")))?;

        let mut replacement = Vec::with_capacity(text.len() + CRLF.len());
        replacement.extend_from_slice(text.as_bytes());
        replacement.extend_from_slice(CRLF);
        splice::splice(self.store, location.span, &replacement)?;
        Ok(appended)
    }

    /// Removes row `row` and its terminator. Returns false if the stream has
    /// no such row.
    pub fn delete_row(&mut self, row: u32) -> Result<bool> {
        match locate::row_span(self.store, &mut self.walker, row)? {
            Some(location) => {
                splice::remove(self.store, location.span)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes cell `(row, column)`, creating the row and padding it with empty
    /// cells as needed. Returns the number of rows appended.
    pub fn write_item(&mut self, row: u32, column: u32, text: &str) -> Result<u32> {
        let appended = splice::ensure_row(self.store, &mut self.walker, row)?;
        let cell = locate::cell_span(self.store, &mut self.walker, row, column)?.ok_or_else(|| {
            Error::store("write", format!("row {row} missing after extension"))
        })?;
        self.fill_cell(cell, column, text.as_bytes())?;
        Ok(appended)
    }

    /// Writes `text` into a located cell, padding a short row first. Returns
    /// the total change in stream length.
    fn fill_cell(&mut self, cell: CellLocation, column: u32, text: &[u8]) -> Result<i64> {
        match cell {
            CellLocation::Found { span, .. } => {
                let delta = splice::splice(self.store, span, text)?;
                Ok(signed(delta))
            }
            CellLocation::Missing { at, cells } => {
                let padding = column - cells;
                splice::pad_cells(self.store, at, padding)?;
                let delta = splice::splice(self.store, Span::point(at + padding), text)?;
                Ok(padding as i64 + signed(delta))
            }
        }
    }

    /// Clears the content of cell `(row, column)`, keeping its delimiters.
    /// Returns false if the stream has no such row. A cell missing from a
    /// short row is already empty.
    pub fn delete_item(&mut self, row: u32, column: u32) -> Result<bool> {
        match locate::cell_span(self.store, &mut self.walker, row, column)? {
            Some(CellLocation::Found { span, .. }) => {
                splice::remove(self.store, span)?;
                Ok(true)
            }
            Some(CellLocation::Missing { .. }) => Ok(true),
            None => Ok(false),
        }
    }

    /// Writes one cell per row into `column`, starting at row 1.
    ///
    /// Each row is walked once from its own start; after a splice the next
    /// row's start is derived from the length change instead of rescanning.
    pub fn write_column(&mut self, column: u32, cells: &[&str]) -> Result<ColumnWrite> {
        let mut outcome = ColumnWrite::default();
        let mut anchor = Anchor::ORIGIN;

        for (i, text) in cells.iter().enumerate() {
            let Some(located) =
                locate::locate(self.store, &mut self.walker, anchor, anchor.row, Some(column))?
            else {
                outcome.rows_appended = self.append_column_rows(column, &cells[i..])?;
                break;
            };
            let cell = located.cell.unwrap_or(CellLocation::Missing {
                at: located.row.content_end(),
                cells: located.row.cells,
            });
            let change = self.fill_cell(cell, column, text.as_bytes())?;
            outcome.rows_updated += 1;
            anchor = Anchor {
                offset: (located.row.span.end as i64 + change) as u32,
                row: anchor.row + 1,
            };
        }
        Ok(outcome)
    }

    /// Appends one row per cell in `cells`, each holding only `column`.
    fn append_column_rows(&mut self, column: u32, cells: &[&str]) -> Result<u32> {
        splice::terminate_last_row(self.store, &mut self.walker)?;
        let end = self.store.size();
        self.store.seek(end)?;

        let leading = vec![b','; (column - 1) as usize];
        for text in cells {
            splice::write_all(self.store, &leading)?;
            splice::write_all(self.store, text.as_bytes())?;
            splice::write_all(self.store, CRLF)?;
        }
        log::debug!(
            "appended {} rows while writing column {column}",
            cells.len()
        );
        Ok(cells.len() as u32)
    }

    /// Removes cell `column` and one adjacent delimiter from every row that
    /// has it. Returns the number of rows changed.
    pub fn delete_column(&mut self, column: u32) -> Result<u32> {
        let mut changed = 0;
        let mut anchor = Anchor::ORIGIN;
        while let Some(located) =
            locate::locate(self.store, &mut self.walker, anchor, anchor.row, Some(column))?
        {
            let mut removed = 0;
            if let Some(CellLocation::Found { span, closer }) = located.cell {
                let target = match closer {
                    Closer::Comma => Span::new(span.start, span.end + 1),
                    Closer::Terminator | Closer::EndOfStream if column > 1 => {
                        Span::new(span.start - 1, span.end)
                    }
                    Closer::Terminator | Closer::EndOfStream => span,
                };
                splice::remove(self.store, target)?;
                removed = target.len();
                changed += 1;
            }
            anchor = Anchor {
                offset: located.row.span.end - removed,
                row: anchor.row + 1,
            };
        }
        Ok(changed)
    }

    /// Positions the cursor for appending whole rows: the last row is
    /// terminated first.
    pub fn prepare_append(&mut self) -> Result<()> {
        splice::terminate_last_row(self.store, &mut self.walker)?;
        let end = self.store.size();
        self.store.seek(end)
    }

    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        splice::write_all(self.store, bytes)
    }
}

fn signed(delta: SpliceDelta) -> i64 {
    match delta {
        SpliceDelta::Unchanged => 0,
        SpliceDelta::Grew(n) => n as i64,
        SpliceDelta::Shrank(n) => -(n as i64),
    }
}
