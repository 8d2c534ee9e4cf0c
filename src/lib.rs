//! # csvsplice
//!
//! Edit a comma-separated, CRLF-terminated table in place, without ever
//! loading it into memory.
//!
//! The table lives in a byte-addressable store ([`ByteStore`]) that only
//! offers cursor reads and writes plus physical `insert` and `delete` of byte
//! runs. [`CsvTable`] turns row, column and cell operations into forward
//! scans over that store through a small fixed scratch window, and realizes
//! every change in cell length as a byte insertion or deletion.
//!
//! ## Quick Start
//!
//! ```rust
//! use csvsplice::{CsvTable, MemoryStore, Result};
//!
//! fn main() -> Result<()> {
//!     let mut table = CsvTable::open(MemoryStore::from_bytes(b"a,b\r\nc\r\nd,e,f\r\n"))?;
//!     assert_eq!((table.row_count(), table.column_count()), (3, 3));
//!
//!     // Cells grow and shrink in place.
//!     table.write_item(2, 1, "longer")?;
//!     assert_eq!(table.read_row(2)?, "longer\r\n");
//!
//!     // Writing past the end pads the table.
//!     table.write_item(5, 2, "x")?;
//!     assert_eq!(table.read_row(4)?, "\r\n");
//!     assert_eq!(table.read_row(5)?, ",x\r\n");
//!
//!     table.delete_column(1)?;
//!     assert_eq!(table.read_column(1)?, "b\r\n\r\ne\r\n\r\nx\r\n");
//!     Ok(())
//! }
//! ```
//!
//! ### Editing a File
//!
//! ```rust,no_run
//! use csvsplice::{CsvTable, FileStore, Result};
//!
//! fn main() -> Result<()> {
//!     let mut table = CsvTable::open(FileStore::open("log.csv")?)?;
//!     let mut rows = table.append()?;
//!     rows.value("12:00")?.float(21.5, 1)?.integer(7, 10)?.end_row()?;
//!     rows.finish()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Table Model
//!
//! - rows are numbered from 1 and end with `\r\n`; the last row may be
//!   unterminated;
//! - cells are numbered from 1 and separated by `,`; rows may be ragged;
//! - a lone `\r` is ordinary content (see [`LineEndings`] for the lenient
//!   mode that also accepts a bare `\n`);
//! - there is no quoting: text containing delimiters is rejected with
//!   [`Error::InvalidText`].
//!
//! Capacity defaults to 1000 rows and 26 columns ([`TableConfig`]).
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Reads of rows or columns that do not
//! exist return an empty string; writes and deletes outside their range
//! return [`Error::RowOutOfRange`] or [`Error::ColumnOutOfRange`]. A failed
//! mutation is not rolled back.
//!
//! ```rust
//! use csvsplice::{CsvTable, Error, MemoryStore};
//!
//! let mut table = CsvTable::open(MemoryStore::from_bytes(b"a,b\r\n")).unwrap();
//! assert_eq!(table.read_item(9, 9).unwrap(), "");
//! assert!(matches!(table.delete_row(2), Err(Error::RowOutOfRange { .. })));
//! assert!(matches!(table.write_item(1, 1, "x,y"), Err(Error::InvalidText { .. })));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod locate;
pub mod scan;
pub(crate) mod splice;
pub mod store;
pub mod table;
pub mod value;

pub use config::{
    ColumnCountPolicy, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS, DEFAULT_SCRATCH_LEN, LineEndings,
    MIN_SCRATCH_LEN, TableConfig,
};
pub use error::{Error, Result};
pub use locate::Span;
pub use scan::TableShape;
pub use store::{ByteStore, Direction, FileStore, MemoryStore};
pub use table::CsvTable;
pub use value::{FLOAT_LIMIT, RowWriter, format_float, format_radix};
