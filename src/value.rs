//! Row-at-a-time value writer.
//!
//! [`RowWriter`] appends rows at the end of a table. Each value becomes one
//! cell; commas go between the cells of a row and [`RowWriter::end_row`]
//! writes the CRLF. Numbers are formatted the way small embedded `print`
//! routines do it, see [`format_radix`] and [`format_float`].
//!
//! ```rust
//! use csvsplice::{CsvTable, MemoryStore};
//!
//! let mut table = CsvTable::open(MemoryStore::from_bytes(b"t,v\r\n"))?;
//! let mut writer = table.append()?;
//! writer.value("10:00")?.float(21.456, 1)?.end_row()?;
//! writer.value("10:05")?.integer(255, 16)?;
//! writer.finish()?;
//!
//! assert_eq!(table.read_row(2)?, "10:00,21.5\r\n");
//! assert_eq!(table.read_row(3)?, "10:05,FF\r\n");
//! # Ok::<(), csvsplice::Error>(())
//! ```

use std::fmt::Display;

use crate::splice::CRLF;
use crate::store::ByteStore;
use crate::table::CsvTable;
use crate::table::text::check_cell;
use crate::{Error, Result};

/// Largest magnitude [`format_float`] prints before giving up with `ovf`.
pub const FLOAT_LIMIT: f64 = 4_294_967_040.0;

/// Appends rows of values to the end of a [`CsvTable`].
///
/// Obtained from [`CsvTable::append`]. The table's counts are updated as
/// values are written, so dropping the writer without [`finish`](Self::finish)
/// leaves a consistent (if unterminated) last row.
#[derive(Debug)]
pub struct RowWriter<'t, S: ByteStore> {
    table: &'t mut CsvTable<S>,
    cells: u32,
    rows: u32,
}

impl<'t, S: ByteStore> RowWriter<'t, S> {
    pub(crate) fn new(table: &'t mut CsvTable<S>) -> Self {
        Self {
            table,
            cells: 0,
            rows: 0,
        }
    }

    /// Returns true while a row has values but no terminator yet.
    pub fn row_open(&self) -> bool {
        self.cells > 0
    }

    /// Number of rows started by this writer.
    pub fn rows_written(&self) -> u32 {
        self.rows
    }

    fn open_row(&mut self) -> Result<()> {
        let row = self.table.row_count() + 1;
        if row > self.table.max_rows() {
            return Err(Error::RowOutOfRange {
                row,
                max: self.table.max_rows(),
            });
        }
        self.table.shape_mut().rows = row;
        self.rows += 1;
        Ok(())
    }

    /// Appends one cell holding `value`'s `Display` text.
    pub fn value(&mut self, value: impl Display) -> Result<&mut Self> {
        let text = value.to_string();
        check_cell(&text)?;
        let column = self.cells + 1;
        if column > self.table.max_columns() {
            return Err(Error::ColumnOutOfRange {
                column,
                max: self.table.max_columns(),
            });
        }
        if column == 1 {
            self.open_row()?;
        }

        let mut bytes = Vec::with_capacity(text.len() + 1);
        if column > 1 {
            bytes.push(b',');
        }
        bytes.extend_from_slice(text.as_bytes());
        self.table.mutate("append", |s| s.write_raw(&bytes))?;

        self.cells = column;
        let shape = self.table.shape_mut();
        shape.columns = shape.columns.max(column);
        Ok(self)
    }

    /// Appends an integer in `radix` (2 to 36; anything else means 10).
    pub fn integer(&mut self, value: i64, radix: u32) -> Result<&mut Self> {
        self.value(format_radix(value, radix))
    }

    /// Appends a float rounded to `digits` decimals.
    pub fn float(&mut self, value: f64, digits: u8) -> Result<&mut Self> {
        self.value(format_float(value, digits))
    }

    /// Terminates the current row. Without any values this writes an empty
    /// row.
    pub fn end_row(&mut self) -> Result<&mut Self> {
        if self.cells == 0 {
            self.open_row()?;
            let shape = self.table.shape_mut();
            shape.columns = shape.columns.max(1);
        }
        self.table.mutate("append", |s| s.write_raw(CRLF))?;
        self.cells = 0;
        Ok(self)
    }

    /// Terminates an open row and releases the table. Returns the number of
    /// rows written.
    pub fn finish(mut self) -> Result<u32> {
        if self.row_open() {
            self.end_row()?;
        }
        log::debug!("appended {} rows", self.rows);
        Ok(self.rows)
    }
}

/// Formats `value` in `radix` with uppercase digits and a leading `-` for
/// negative values.
///
/// ```rust
/// use csvsplice::format_radix;
///
/// assert_eq!(format_radix(-255, 16), "-FF");
/// assert_eq!(format_radix(5, 2), "101");
/// assert_eq!(format_radix(42, 1), "42");
/// ```
pub fn format_radix(value: i64, radix: u32) -> String {
    let radix = if (2..=36).contains(&radix) { radix } else { 10 };
    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    loop {
        let d = (magnitude % radix as u64) as u32;
        digits.push(char::from_digit(d, radix).map_or('?', |c| c.to_ascii_uppercase()));
        magnitude /= radix as u64;
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// Formats `value` with exactly `digits` decimals.
///
/// Rounds half up by adding `0.5 / 10^digits` and then truncating, prints
/// `nan` and `inf` for non-finite values and `ovf` beyond
/// ±[`FLOAT_LIMIT`].
///
/// ```rust
/// use csvsplice::format_float;
///
/// assert_eq!(format_float(3.14159, 2), "3.14");
/// assert_eq!(format_float(-0.5, 0), "-1");
/// assert_eq!(format_float(1e12, 2), "ovf");
/// ```
pub fn format_float(value: f64, digits: u8) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return "inf".to_string();
    }
    if !(-FLOAT_LIMIT..=FLOAT_LIMIT).contains(&value) {
        return "ovf".to_string();
    }

    let mut out = String::new();
    let mut number = value;
    if number < 0.0 {
        out.push('-');
        number = -number;
    }

    let mut rounding = 0.5;
    for _ in 0..digits {
        rounding /= 10.0;
    }
    number += rounding;

    let int_part = number as u32;
    let mut remainder = number - int_part as f64;
    out.push_str(&int_part.to_string());
    if digits > 0 {
        out.push('.');
    }
    for _ in 0..digits {
        remainder *= 10.0;
        let digit = remainder as u32;
        out.push_str(&digit.to_string());
        remainder -= digit as f64;
    }
    out
}
