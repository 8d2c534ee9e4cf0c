//! Chunked forward walk over a stream.
//!
//! The walker is the single scan loop behind the structure scanner, the span
//! locator and the multi-row mutations. It reads the store through the
//! caller's scratch window, feeds each byte to the [`Lexer`], and reports
//! structure as [`Event`]s. The visitor can stop the walk early by returning
//! [`ControlFlow::Break`].

use std::ops::ControlFlow;

use super::lexer::{Action, Lexer};
use crate::config::{LineEndings, MIN_SCRATCH_LEN};
use crate::locate::Span;
use crate::store::ByteStore;
use crate::{Error, Result};

/// A known row start: byte offset plus the row number that begins there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub offset: u32,
    pub row: u32,
}

impl Anchor {
    /// Start of the stream, row 1.
    pub const ORIGIN: Anchor = Anchor { offset: 0, row: 1 };
}

/// What closed a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closer {
    /// A `,` directly at `span.end`.
    Comma,
    /// The row terminator, starting at `span.end`.
    Terminator,
    /// The end of the stream.
    EndOfStream,
}

/// Structure found by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A cell ended. `span` excludes the delimiter that closed it.
    Cell {
        row: u32,
        column: u32,
        span: Span,
        closer: Closer,
    },
    /// A row ended. Emitted right after the row's last [`Event::Cell`].
    Row {
        row: u32,
        /// Number of cells in the row (an empty row has one empty cell).
        cells: u32,
        /// Row bytes including the terminator, if any.
        span: Span,
        /// Terminator length: 2 for CRLF, 1 for a lenient bare LF, 0 at end
        /// of stream.
        terminator: u32,
    },
}

/// Scan loop over a borrowed scratch window.
pub struct Walker<'a> {
    scratch: &'a mut [u8],
    endings: LineEndings,
    cooperative_yield: bool,
}

impl<'a> Walker<'a> {
    /// Creates a walker. Scratch windows shorter than two bytes are rejected
    /// by the table before they get here.
    pub fn new(scratch: &'a mut [u8], endings: LineEndings, cooperative_yield: bool) -> Self {
        debug_assert!(scratch.len() >= MIN_SCRATCH_LEN);
        Self {
            scratch,
            endings,
            cooperative_yield,
        }
    }

    /// Walks forward from `from` to the end of the stream, or until `visit`
    /// breaks.
    ///
    /// Returns the break value, or `None` when the end was reached. The store
    /// cursor is left wherever the walk stopped reading.
    pub fn walk<S, B, F>(&mut self, store: &mut S, from: Anchor, mut visit: F) -> Result<Option<B>>
    where
        S: ByteStore + ?Sized,
        F: FnMut(Event) -> ControlFlow<B>,
    {
        macro_rules! emit {
            ($event:expr) => {
                if let ControlFlow::Break(value) = visit($event) {
                    return Ok(Some(value));
                }
            };
        }

        let size = store.size();
        if from.offset > size {
            return Err(Error::SeekFailed {
                offset: from.offset,
            });
        }
        store.seek(from.offset)?;

        let mut lexer = Lexer::new(self.endings);
        let mut row = from.row;
        let mut column = 1;
        let mut row_start = from.offset;
        let mut cell_start = from.offset;
        let mut offset = from.offset;
        let mut remaining = size - from.offset;

        while remaining > 0 {
            let want = (remaining as usize).min(self.scratch.len());
            let got = store.read(&mut self.scratch[..want])?;
            if got != want {
                return Err(Error::ShortRead {
                    offset,
                    expected: want,
                    actual: got,
                });
            }
            remaining -= want as u32;

            for &byte in &self.scratch[..want] {
                match lexer.feed_byte(byte) {
                    Action::CellBreak => {
                        emit!(Event::Cell {
                            row,
                            column,
                            span: Span::new(cell_start, offset),
                            closer: Closer::Comma,
                        });
                        column += 1;
                        cell_start = offset + 1;
                    }
                    Action::RowBreak(len) => {
                        let end = offset + 1;
                        let terminator = len as u32;
                        emit!(Event::Cell {
                            row,
                            column,
                            span: Span::new(cell_start, end - terminator),
                            closer: Closer::Terminator,
                        });
                        emit!(Event::Row {
                            row,
                            cells: column,
                            span: Span::new(row_start, end),
                            terminator,
                        });
                        row += 1;
                        column = 1;
                        row_start = end;
                        cell_start = end;
                    }
                    Action::None | Action::Finish { .. } => {}
                }
                offset += 1;
            }

            if self.cooperative_yield {
                std::thread::yield_now();
            }
        }

        if lexer.finish() {
            emit!(Event::Cell {
                row,
                column,
                span: Span::new(cell_start, size),
                closer: Closer::EndOfStream,
            });
            emit!(Event::Row {
                row,
                cells: column,
                span: Span::new(row_start, size),
                terminator: 0,
            });
        }
        Ok(None)
    }

    /// Copies `span` out of the store through the scratch window.
    pub fn read_span<S: ByteStore + ?Sized>(
        &mut self,
        store: &mut S,
        span: Span,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        store.seek(span.start)?;
        let mut offset = span.start;
        while offset < span.end {
            let want = ((span.end - offset) as usize).min(self.scratch.len());
            let got = store.read(&mut self.scratch[..want])?;
            if got != want {
                return Err(Error::ShortRead {
                    offset,
                    expected: want,
                    actual: got,
                });
            }
            out.extend_from_slice(&self.scratch[..want]);
            offset += want as u32;
        }
        Ok(())
    }

    /// Returns true if the stream is empty or its last bytes end a row.
    pub fn ends_with_terminator<S: ByteStore + ?Sized>(&mut self, store: &mut S) -> Result<bool> {
        let size = store.size();
        if size == 0 {
            return Ok(true);
        }
        let tail = size.min(2);
        store.seek(size - tail)?;
        let got = store.read(&mut self.scratch[..tail as usize])?;
        if got != tail as usize {
            return Err(Error::ShortRead {
                offset: size - tail,
                expected: tail as usize,
                actual: got,
            });
        }
        let tail = &self.scratch[..got];
        Ok(match self.endings {
            LineEndings::CrLf => tail.ends_with(b"\r\n"),
            LineEndings::LenientLf => tail.ends_with(b"\n"),
        })
    }
}
