//! Configuration for table editing.
//!
//! This module provides [`TableConfig`] for controlling the scratch window,
//! table capacity, how bare line feeds are treated and how the column count
//! reacts to a column delete.

/// Default scratch window.
pub const DEFAULT_SCRATCH_LEN: usize = 32;

/// Smallest usable scratch window.
pub const MIN_SCRATCH_LEN: usize = 2;

/// Largest row number a table may grow to by default.
pub const DEFAULT_MAX_ROWS: u32 = 1000;

/// Largest column number a table may grow to by default (`A`..=`Z`).
pub const DEFAULT_MAX_COLUMNS: u32 = (b'Z' - b'A' + 1) as u32;

/// Which byte sequences terminate a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndings {
    /// Only `\r\n` ends a row. A lone `\r` or `\n` is cell content.
    #[default]
    CrLf,
    /// `\r\n` or a bare `\n` ends a row.
    ///
    /// Applies to every operation, so scans and edits agree on row
    /// boundaries.
    LenientLf,
}

/// How the cached column count changes after
/// [`CsvTable::delete_column`](crate::CsvTable::delete_column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnCountPolicy {
    /// Always decrement by one, even when the deleted column was not the
    /// widest row's last column.
    #[default]
    Decrement,
    /// Rescan the stream and use the true maximum.
    Rescan,
}

/// Configuration for a [`CsvTable`](crate::CsvTable).
///
/// # Example
///
/// ```rust
/// use csvsplice::{ColumnCountPolicy, TableConfig};
///
/// let config = TableConfig::new()
///     .scratch_len(128)
///     .column_count_on_delete(ColumnCountPolicy::Rescan);
/// assert_eq!(config.max_rows, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Size of the scratch window used for every scan (bytes).
    ///
    /// The window is owned by the table and reused across calls.
    /// Default: 32. Values below 2 are raised to 2.
    pub scratch_len: usize,

    /// Largest row number accepted by write operations.
    ///
    /// Default: 1000.
    pub max_rows: u32,

    /// Largest column number accepted by write operations.
    ///
    /// Default: 26.
    pub max_columns: u32,

    /// Column count behavior after a column delete.
    ///
    /// Default: [`ColumnCountPolicy::Decrement`].
    pub column_count_on_delete: ColumnCountPolicy,

    /// Row terminator recognition.
    ///
    /// Default: [`LineEndings::CrLf`].
    pub line_endings: LineEndings,

    /// Yield the thread between chunk reads.
    ///
    /// Scans are long on slow stores; yielding lets other work run.
    /// Default: false.
    pub cooperative_yield: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            scratch_len: DEFAULT_SCRATCH_LEN,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
            column_count_on_delete: ColumnCountPolicy::default(),
            line_endings: LineEndings::default(),
            cooperative_yield: false,
        }
    }
}

impl TableConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scratch window size.
    pub fn scratch_len(mut self, len: usize) -> Self {
        self.scratch_len = len.max(MIN_SCRATCH_LEN);
        self
    }

    /// Sets the largest writable row.
    pub fn max_rows(mut self, rows: u32) -> Self {
        self.max_rows = rows;
        self
    }

    /// Sets the largest writable column.
    pub fn max_columns(mut self, columns: u32) -> Self {
        self.max_columns = columns;
        self
    }

    /// Sets the column count policy for column deletes.
    pub fn column_count_on_delete(mut self, policy: ColumnCountPolicy) -> Self {
        self.column_count_on_delete = policy;
        self
    }

    /// Sets row terminator recognition.
    pub fn line_endings(mut self, endings: LineEndings) -> Self {
        self.line_endings = endings;
        self
    }

    /// Enables or disables yielding between chunk reads.
    pub fn cooperative_yield(mut self, enabled: bool) -> Self {
        self.cooperative_yield = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.scratch_len, 32);
        assert_eq!(config.max_rows, 1000);
        assert_eq!(config.max_columns, 26);
        assert_eq!(config.column_count_on_delete, ColumnCountPolicy::Decrement);
        assert_eq!(config.line_endings, LineEndings::CrLf);
        assert!(!config.cooperative_yield);
    }

    #[test]
    fn test_scratch_len_floor() {
        assert_eq!(TableConfig::new().scratch_len(0).scratch_len, MIN_SCRATCH_LEN);
        assert_eq!(TableConfig::new().scratch_len(7).scratch_len, 7);
    }
}
