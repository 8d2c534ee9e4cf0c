//! Error types for table editing operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when editing a delimited stream, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Errors fall
//! into three groups:
//!
//! - **initialization**: the table has no usable store ([`Error::NoStream`],
//!   [`Error::NotOpen`], [`Error::IsDirectory`]) or the first scan could not
//!   rewind or read the stream ([`Error::SeekFailed`], [`Error::ShortRead`]);
//! - **range**: a row or column index is outside the permitted bounds;
//! - **transport**: a store primitive failed ([`Error::Io`], [`Error::Store`]).
//!
//! ```rust
//! use csvsplice::{CsvTable, Error, MemoryStore};
//!
//! let mut table = CsvTable::open(MemoryStore::from_bytes(b"a,b\r\n")).unwrap();
//! match table.write_row(1001, "x") {
//!     Err(Error::RowOutOfRange { row, max }) => assert_eq!((row, max), (1001, 1000)),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! A failed mutation is never rolled back. When a transport error interrupts a
//! multi-step splice the stream may be left structurally inconsistent; call
//! [`CsvTable::rescan`](crate::CsvTable::rescan) before trusting the counts.

use std::io;

use thiserror::Error;

/// Error type for table operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred inside a store primitive.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The table has no store attached.
    #[error("no stream attached to the table")]
    NoStream,

    /// The attached store is not open.
    #[error("stream is not open")]
    NotOpen,

    /// The attached store refers to a directory, not a file.
    #[error("stream is a directory")]
    IsDirectory,

    /// Repositioning the stream cursor failed.
    #[error("seek to offset {offset} failed")]
    SeekFailed {
        /// The requested offset.
        offset: u32,
    },

    /// A read returned fewer bytes than the stream size promised.
    #[error("short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Offset the read started at.
        offset: u32,
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes delivered.
        actual: usize,
    },

    /// A row index is outside the permitted range.
    #[error("row {row} out of range (1..={max})")]
    RowOutOfRange {
        /// The requested row.
        row: u32,
        /// The largest row accepted for this operation.
        max: u32,
    },

    /// A column index is outside the permitted range.
    #[error("column {column} out of range (1..={max})")]
    ColumnOutOfRange {
        /// The requested column.
        column: u32,
        /// The largest column accepted for this operation.
        max: u32,
    },

    /// Text passed to a write would change the table structure.
    ///
    /// Cells cannot contain `,`, `\r` or `\n`; rows cannot contain `\r` or
    /// `\n`. No escaping is provided.
    #[error("invalid text: {reason}")]
    InvalidText {
        /// What was wrong with the text.
        reason: String,
    },

    /// A column write was given no cells.
    #[error("column data is empty")]
    EmptyColumnData,

    /// A store primitive reported failure without an underlying I/O error.
    #[error("store {op} failed: {reason}")]
    Store {
        /// The primitive that failed (`insert`, `delete`, ...).
        op: &'static str,
        /// Why it failed.
        reason: String,
    },
}

impl Error {
    /// Creates a [`Error::Store`] error for the given primitive.
    pub(crate) fn store(op: &'static str, reason: impl Into<String>) -> Self {
        Error::Store {
            op,
            reason: reason.into(),
        }
    }

    /// Creates a [`Error::InvalidText`] error.
    pub(crate) fn invalid_text(reason: impl Into<String>) -> Self {
        Error::InvalidText {
            reason: reason.into(),
        }
    }

    /// Returns true if this error was raised while attaching or scanning a
    /// stream, before any mutation took place.
    pub fn is_initialization_error(&self) -> bool {
        matches!(
            self,
            Error::NoStream
                | Error::NotOpen
                | Error::IsDirectory
                | Error::SeekFailed { .. }
                | Error::ShortRead { .. }
        )
    }

    /// Returns true if this error is a rejected row or column index.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Error::RowOutOfRange { .. } | Error::ColumnOutOfRange { .. }
        )
    }

    /// Returns true if a store primitive failed.
    ///
    /// Transport errors raised in the middle of a mutation may leave the
    /// stream partially edited.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Store { .. })
    }

    /// Returns the numeric status code of an initialization error.
    ///
    /// | code | meaning |
    /// |------|---------|
    /// | 1 | no stream |
    /// | 2 | stream not open |
    /// | 3 | stream is a directory |
    /// | 4 | rewinding to offset 0 failed |
    /// | 5 | read length mismatch while scanning |
    ///
    /// Errors outside the initialization group return `None`.
    pub fn status_code(&self) -> Option<u8> {
        match self {
            Error::NoStream => Some(1),
            Error::NotOpen => Some(2),
            Error::IsDirectory => Some(3),
            Error::SeekFailed { .. } => Some(4),
            Error::ShortRead { .. } => Some(5),
            _ => None,
        }
    }
}

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
