//! The table editor.
//!
//! [`CsvTable`] exposes a CRLF/comma delimited byte stream as a table of rows
//! and cells. It holds the stream's [`ByteStore`], a small scratch window and
//! the row and column counts from the last scan. Nothing else is cached: every
//! accessor walks the stream again to find the span it works on.
//!
//! # Range rules
//!
//! | Operation | Row range | Column range | Out of range |
//! |-----------|-----------|--------------|--------------|
//! | `read_*`  | `1..=row_count()` | `1..=column_count()` | `Ok("")` |
//! | `write_*` | `1..=max_rows` | `1..=max_columns` | `Err(..OutOfRange)` |
//! | `delete_*` | `1..=row_count()` | `1..=column_count()` | `Err(..OutOfRange)` |
//!
//! Writes past the current extent grow the table: missing rows are appended
//! as empty rows and short rows are padded with empty cells.
//!
//! # Counts
//!
//! `row_count()` and `column_count()` are advisory. They are kept in step by
//! the mutations below, but [`delete_row`](CsvTable::delete_row) never lowers
//! the column count, [`delete_column`](CsvTable::delete_column) lowers it by
//! one whether or not the widest row lost a cell (unless configured otherwise,
//! see [`ColumnCountPolicy`]), and a failed mutation leaves both as they were.
//! Call [`rescan`](CsvTable::rescan) to make them exact.
//!
//! # Example
//!
//! ```rust
//! use csvsplice::{CsvTable, MemoryStore};
//!
//! let mut table = CsvTable::open(MemoryStore::new())?;
//! table.write_item(1, 1, "A")?;
//! table.write_item(1, 2, "B")?;
//! assert_eq!(table.read_row(1)?, "A,B\r\n");
//! assert_eq!((table.row_count(), table.column_count()), (1, 2));
//! # Ok::<(), csvsplice::Error>(())
//! ```

mod session;
pub(crate) mod text;

use crate::config::{ColumnCountPolicy, MIN_SCRATCH_LEN, TableConfig};
use crate::scan::{TableShape, Walker};
use crate::store::ByteStore;
use crate::value::RowWriter;
use crate::{Error, Result};

pub(crate) use session::Session;
use text::{check_cell, check_row, split_column};

/// A row/column view over a delimited byte stream.
///
/// The table is generic over the store so that it can own a store or borrow
/// one (`&mut S` is a store too).
#[derive(Debug)]
pub struct CsvTable<S: ByteStore> {
    store: Option<S>,
    config: TableConfig,
    scratch: Box<[u8]>,
    shape: TableShape,
}

impl<S: ByteStore> Default for CsvTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteStore> CsvTable<S> {
    /// Creates a table with no stream attached and the default configuration.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates a table with no stream attached.
    pub fn with_config(config: TableConfig) -> Self {
        let scratch = vec![0u8; config.scratch_len.max(MIN_SCRATCH_LEN)].into_boxed_slice();
        Self {
            store: None,
            config,
            scratch,
            shape: TableShape::default(),
        }
    }

    /// Attaches `store` and scans it with the default configuration.
    pub fn open(store: S) -> Result<Self> {
        Self::open_with_config(store, TableConfig::default())
    }

    /// Attaches `store` and scans it.
    pub fn open_with_config(store: S, config: TableConfig) -> Result<Self> {
        let mut table = Self::with_config(config);
        table.begin(store)?;
        Ok(table)
    }

    /// Attaches `store`, replacing any previous one, and scans it.
    ///
    /// The store stays attached even when the scan fails, so the caller can
    /// inspect it or recover it with [`detach`](Self::detach). The store
    /// cursor is restored after a successful scan.
    ///
    /// # Errors
    ///
    /// [`Error::NotOpen`], [`Error::IsDirectory`], [`Error::SeekFailed`] or
    /// [`Error::ShortRead`]; see [`Error::status_code`] for the numeric codes.
    pub fn begin(&mut self, store: S) -> Result<TableShape> {
        self.store = Some(store);
        self.shape = TableShape::default();
        self.rescan()
    }

    /// Scans the attached stream again and replaces the cached counts.
    pub fn rescan(&mut self) -> Result<TableShape> {
        let shape = self.session()?.scan()?;
        self.shape = shape;
        Ok(shape)
    }

    /// Number of rows, as of the last scan or mutation.
    pub fn row_count(&self) -> u32 {
        self.shape.rows
    }

    /// Cell count of the widest row, as of the last scan or mutation.
    pub fn column_count(&self) -> u32 {
        self.shape.columns
    }

    /// Both counts at once.
    pub fn shape(&self) -> TableShape {
        self.shape
    }

    /// Returns true if a store is attached and usable.
    pub fn is_ready(&self) -> bool {
        self.store
            .as_ref()
            .is_some_and(|s| s.is_open() && !s.is_directory())
    }

    /// Configuration the table was created with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The attached store, if any.
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    /// Mutable access to the attached store.
    ///
    /// Changes made directly to the stream are not reflected in the counts
    /// until the next [`rescan`](Self::rescan).
    pub fn store_mut(&mut self) -> Option<&mut S> {
        self.store.as_mut()
    }

    /// Detaches and returns the store, resetting the counts.
    pub fn detach(&mut self) -> Option<S> {
        self.shape = TableShape::default();
        self.store.take()
    }

    /// Consumes the table and returns the store.
    pub fn into_store(self) -> Option<S> {
        self.store
    }

    pub(crate) fn session(&mut self) -> Result<Session<'_, S>> {
        let store = self.store.as_mut().ok_or(Error::NoStream)?;
        if !store.is_open() {
            return Err(Error::NotOpen);
        }
        if store.is_directory() {
            return Err(Error::IsDirectory);
        }
        Ok(Session {
            store,
            walker: Walker::new(
                &mut self.scratch,
                self.config.line_endings,
                self.config.cooperative_yield,
            ),
        })
    }

    /// Runs a mutation, logging failures that may have left the stream
    /// partially edited.
    pub(crate) fn mutate<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Session<'_, S>) -> Result<T>,
    ) -> Result<T> {
        let mut session = self.session()?;
        f(&mut session).inspect_err(|e| {
            log::warn!("{op} failed, stream may be left partially edited: {e}");
        })
    }

    pub(crate) fn shape_mut(&mut self) -> &mut TableShape {
        &mut self.shape
    }

    fn check_write_row(&self, row: u32) -> Result<()> {
        if row == 0 || row > self.config.max_rows {
            log::debug!("write rejected: row {row} outside 1..={}", self.config.max_rows);
            return Err(Error::RowOutOfRange {
                row,
                max: self.config.max_rows,
            });
        }
        Ok(())
    }

    fn check_write_column(&self, column: u32) -> Result<()> {
        if column == 0 || column > self.config.max_columns {
            log::debug!(
                "write rejected: column {column} outside 1..={}",
                self.config.max_columns
            );
            return Err(Error::ColumnOutOfRange {
                column,
                max: self.config.max_columns,
            });
        }
        Ok(())
    }

    fn check_existing_row(&self, row: u32) -> Result<()> {
        if row == 0 || row > self.shape.rows {
            log::debug!("delete rejected: row {row} outside 1..={}", self.shape.rows);
            return Err(Error::RowOutOfRange {
                row,
                max: self.shape.rows,
            });
        }
        Ok(())
    }

    fn check_existing_column(&self, column: u32) -> Result<()> {
        if column == 0 || column > self.shape.columns {
            log::debug!(
                "delete rejected: column {column} outside 1..={}",
                self.shape.columns
            );
            return Err(Error::ColumnOutOfRange {
                column,
                max: self.shape.columns,
            });
        }
        Ok(())
    }

    /// Reads row `row` including its CRLF terminator.
    ///
    /// Returns an empty string when `row` is outside `1..=row_count()`. Bytes
    /// that are not valid UTF-8 are replaced with U+FFFD.
    pub fn read_row(&mut self, row: u32) -> Result<String> {
        let shape = self.shape;
        let mut session = self.session()?;
        if row == 0 || row > shape.rows {
            log::debug!("read_row: row {row} outside 1..={}", shape.rows);
            return Ok(String::new());
        }
        let bytes = session.read_row(row)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads cell `column` of every row, each followed by CRLF.
    ///
    /// Rows without that cell contribute an empty line.
    pub fn read_column(&mut self, column: u32) -> Result<String> {
        let shape = self.shape;
        let mut session = self.session()?;
        if column == 0 || column > shape.columns {
            log::debug!("read_column: column {column} outside 1..={}", shape.columns);
            return Ok(String::new());
        }
        let bytes = session.read_column(column)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads cell `(row, column)`. A cell missing from a short row reads as
    /// empty.
    pub fn read_item(&mut self, row: u32, column: u32) -> Result<String> {
        let shape = self.shape;
        let mut session = self.session()?;
        if row == 0 || row > shape.rows || column == 0 || column > shape.columns {
            log::debug!(
                "read_item: ({row}, {column}) outside {}x{}",
                shape.rows,
                shape.columns
            );
            return Ok(String::new());
        }
        let bytes = session.read_item(row, column)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replaces row `row` with `text`, appending empty rows first if the table
    /// is shorter.
    ///
    /// `text` is one row without terminator; a CRLF is added.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidText`] if `text` contains a line break,
    /// [`Error::ColumnOutOfRange`] if it has more cells than `max_columns`.
    pub fn write_row(&mut self, row: u32, text: &str) -> Result<()> {
        self.check_write_row(row)?;
        let cells = check_row(text)?;
        if cells > self.config.max_columns {
            return Err(Error::ColumnOutOfRange {
                column: cells,
                max: self.config.max_columns,
            });
        }

        self.mutate("write_row", |s| s.write_row(row, text))?;
        self.shape.rows = self.shape.rows.max(row);
        self.shape.columns = self.shape.columns.max(cells);
        Ok(())
    }

    /// Writes `data` into `column`, one CRLF-separated cell per row starting
    /// at row 1.
    ///
    /// A trailing CRLF in `data` is optional. Rows that are too short are
    /// padded, and rows past the end of the table are appended with only
    /// this column filled.
    pub fn write_column(&mut self, column: u32, data: &str) -> Result<()> {
        self.check_write_column(column)?;
        let cells = split_column(data)?;
        let rows = u32::try_from(cells.len()).unwrap_or(u32::MAX);
        self.check_write_row(rows)?;

        let outcome = self.mutate("write_column", |s| s.write_column(column, &cells))?;
        log::debug!(
            "write_column {column}: {} rows updated, {} appended",
            outcome.rows_updated,
            outcome.rows_appended
        );
        self.shape.rows = self.shape.rows.max(rows);
        self.shape.columns = self.shape.columns.max(column);
        Ok(())
    }

    /// Writes cell `(row, column)`, creating the row and padding it with
    /// empty cells as needed.
    pub fn write_item(&mut self, row: u32, column: u32, text: &str) -> Result<()> {
        self.check_write_row(row)?;
        self.check_write_column(column)?;
        check_cell(text)?;

        self.mutate("write_item", |s| s.write_item(row, column, text))?;
        self.shape.rows = self.shape.rows.max(row);
        self.shape.columns = self.shape.columns.max(column);
        Ok(())
    }

    /// Removes row `row` and its terminator.
    pub fn delete_row(&mut self, row: u32) -> Result<()> {
        self.check_existing_row(row)?;
        if self.mutate("delete_row", |s| s.delete_row(row))? {
            self.shape.rows -= 1;
        } else {
            log::debug!("delete_row: row {row} no longer present in the stream");
        }
        Ok(())
    }

    /// Removes cell `column`, and one adjacent comma, from every row that has
    /// it. Cells to the right move one column left.
    ///
    /// The column count then follows
    /// [`TableConfig::column_count_on_delete`].
    pub fn delete_column(&mut self, column: u32) -> Result<()> {
        self.check_existing_column(column)?;
        let policy = self.config.column_count_on_delete;

        let (changed, rescanned) = self.mutate("delete_column", |s| {
            let changed = s.delete_column(column)?;
            let rescanned = match policy {
                ColumnCountPolicy::Decrement => None,
                ColumnCountPolicy::Rescan => Some(s.scan()?),
            };
            Ok((changed, rescanned))
        })?;
        log::debug!("delete_column {column}: {changed} rows changed");

        match rescanned {
            Some(shape) => self.shape = shape,
            None => self.shape.columns -= 1,
        }
        Ok(())
    }

    /// Clears the content of cell `(row, column)`, keeping its delimiters.
    pub fn delete_item(&mut self, row: u32, column: u32) -> Result<()> {
        self.check_existing_row(row)?;
        self.check_existing_column(column)?;
        if !self.mutate("delete_item", |s| s.delete_item(row, column))? {
            log::debug!("delete_item: row {row} no longer present in the stream");
        }
        Ok(())
    }

    /// Starts appending rows at the end of the stream.
    ///
    /// An unterminated last row is terminated first, so the first value
    /// always starts a new row.
    pub fn append(&mut self) -> Result<RowWriter<'_, S>> {
        self.mutate("append", |s| s.prepare_append())?;
        Ok(RowWriter::new(self))
    }

    pub(crate) fn max_rows(&self) -> u32 {
        self.config.max_rows
    }

    pub(crate) fn max_columns(&self) -> u32 {
        self.config.max_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEndings;
    use crate::store::MemoryStore;

    fn table(content: &[u8]) -> CsvTable<MemoryStore> {
        CsvTable::open(MemoryStore::from_bytes(content)).unwrap()
    }

    fn bytes(table: &CsvTable<MemoryStore>) -> &[u8] {
        table.store().unwrap().as_bytes()
    }

    #[test]
    fn test_begin_reports_shape() {
        let t = table(b"a,b\r\nc\r\nd,e,f\r\n");
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column_count(), 3);
        assert!(t.is_ready());
    }

    #[test]
    fn test_begin_errors() {
        let mut t = CsvTable::new();
        assert!(matches!(t.begin(MemoryStore::closed()), Err(Error::NotOpen)));
        assert!(matches!(
            t.begin(MemoryStore::directory()),
            Err(Error::IsDirectory)
        ));
        assert!(!t.is_ready());

        let mut empty: CsvTable<MemoryStore> = CsvTable::new();
        assert!(matches!(empty.read_row(1), Err(Error::NoStream)));
    }

    #[test]
    fn test_reads() {
        let mut t = table(b"a,b\r\nc\r\nd,e,f\r\n");
        assert_eq!(t.read_row(2).unwrap(), "c\r\n");
        assert_eq!(t.read_item(3, 3).unwrap(), "f");
        assert_eq!(t.read_item(2, 2).unwrap(), "");
        assert_eq!(t.read_column(2).unwrap(), "b\r\n\r\ne\r\n");
        assert_eq!(t.read_row(0).unwrap(), "");
        assert_eq!(t.read_row(4).unwrap(), "");
        assert_eq!(t.read_column(4).unwrap(), "");
    }

    #[test]
    fn test_write_row_replaces_and_extends() {
        let mut t = table(b"a,b\r\nc\r\n");
        t.write_row(1, "x").unwrap();
        assert_eq!(bytes(&t), b"x\r\nc\r\n");

        t.write_row(4, "p,q,r").unwrap();
        assert_eq!(bytes(&t), b"x\r\nc\r\n\r\np,q,r\r\n");
        assert_eq!(t.shape(), TableShape { rows: 4, columns: 3 });
        assert_eq!(t.read_row(3).unwrap(), "\r\n");
    }

    #[test]
    fn test_write_row_terminates_last_row() {
        let mut t = table(b"a\r\nb");
        t.write_row(2, "bb").unwrap();
        assert_eq!(bytes(&t), b"a\r\nbb\r\n");
    }

    #[test]
    fn test_write_row_range() {
        let mut t = table(b"");
        assert!(matches!(
            t.write_row(0, "x"),
            Err(Error::RowOutOfRange { row: 0, max: 1000 })
        ));
        assert!(matches!(
            t.write_row(1, "a\r\nb"),
            Err(Error::InvalidText { .. })
        ));
        let wide = vec!["c"; 27].join(",");
        assert!(matches!(
            t.write_row(1, &wide),
            Err(Error::ColumnOutOfRange { column: 27, .. })
        ));
        assert!(bytes(&t).is_empty());
    }

    #[test]
    fn test_write_item_round_trip() {
        let mut t = table(b"");
        t.write_item(1, 1, "A").unwrap();
        t.write_item(1, 2, "B").unwrap();
        assert_eq!(t.read_row(1).unwrap(), "A,B\r\n");
    }

    #[test]
    fn test_write_item_pads_and_resizes() {
        let mut t = table(b"a,b\r\nc\r\n");
        t.write_item(2, 4, "z").unwrap();
        assert_eq!(bytes(&t), b"a,b\r\nc,,,z\r\n");
        assert_eq!(t.column_count(), 4);

        t.write_item(1, 1, "longer").unwrap();
        t.write_item(1, 2, "").unwrap();
        assert_eq!(bytes(&t), b"longer,\r\nc,,,z\r\n");
    }

    #[test]
    fn test_write_item_unterminated_row_stays_unterminated() {
        let mut t = table(b"a\r\nb,c");
        t.write_item(2, 2, "cc").unwrap();
        assert_eq!(bytes(&t), b"a\r\nb,cc");
    }

    #[test]
    fn test_write_column() {
        let mut t = table(b"a,b\r\nc\r\n");
        t.write_column(2, "x\r\ny\r\nz\r\n").unwrap();
        assert_eq!(bytes(&t), b"a,x\r\nc,y\r\n,z\r\n");
        assert_eq!(t.shape(), TableShape { rows: 3, columns: 2 });

        assert!(matches!(
            t.write_column(1, ""),
            Err(Error::EmptyColumnData)
        ));
    }

    #[test]
    fn test_delete_row() {
        let mut t = table(b"a\r\nb\r\nc");
        t.delete_row(2).unwrap();
        assert_eq!(bytes(&t), b"a\r\nc");
        assert_eq!(t.row_count(), 2);
        assert!(matches!(
            t.delete_row(3),
            Err(Error::RowOutOfRange { row: 3, max: 2 })
        ));
    }

    #[test]
    fn test_delete_item_keeps_delimiters() {
        let mut t = table(b"a,b,c\r\nd\r\n");
        t.delete_item(1, 2).unwrap();
        assert_eq!(bytes(&t), b"a,,c\r\nd\r\n");
        t.delete_item(2, 3).unwrap();
        assert_eq!(bytes(&t), b"a,,c\r\nd\r\n");
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn test_delete_column_decrements() {
        let mut t = table(b"a,b,c\r\nd\r\ne,f\r\n");
        t.delete_column(2).unwrap();
        assert_eq!(bytes(&t), b"a,c\r\nd\r\ne\r\n");
        assert_eq!(t.column_count(), 2);

        t.delete_column(1).unwrap();
        assert_eq!(bytes(&t), b"c\r\n\r\n\r\n");
        assert_eq!(t.column_count(), 1);
    }

    #[test]
    fn test_delete_column_rescan_policy() {
        let config = TableConfig::new().column_count_on_delete(ColumnCountPolicy::Rescan);
        let mut t =
            CsvTable::open_with_config(MemoryStore::from_bytes(b"a,b,c\r\nd,e,f\r\n"), config)
                .unwrap();
        t.delete_column(3).unwrap();
        assert_eq!(t.column_count(), 2);
        t.write_row(1, "1,2,3,4").unwrap();
        t.delete_column(4).unwrap();
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn test_lenient_line_endings() {
        let config = TableConfig::new().line_endings(LineEndings::LenientLf);
        let mut t =
            CsvTable::open_with_config(MemoryStore::from_bytes(b"a\nb,c\r\n"), config).unwrap();
        assert_eq!(t.shape(), TableShape { rows: 2, columns: 2 });
        assert_eq!(t.read_item(2, 2).unwrap(), "c");
    }

    #[test]
    fn test_detach() {
        let mut t = table(b"a\r\n");
        let store = t.detach().unwrap();
        assert_eq!(store.as_bytes(), b"a\r\n");
        assert_eq!(t.row_count(), 0);
        assert!(matches!(t.write_row(1, "x"), Err(Error::NoStream)));
    }

    #[test]
    fn test_borrowed_store() {
        let mut store = MemoryStore::from_bytes(b"a,b\r\n");
        {
            let mut t = CsvTable::open(&mut store).unwrap();
            t.write_item(1, 2, "c").unwrap();
        }
        assert_eq!(store.as_bytes(), b"a,c\r\n");
    }
}
