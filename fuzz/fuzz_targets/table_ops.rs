//! Fuzz target for sequences of edits on an arbitrary table.
//!
//! The first input byte selects how much of the rest seeds the table; the
//! remainder is decoded as a list of operations. Counts are resynchronized
//! with a fresh scan after every successful edit.
//!
//! Run with: cargo +nightly fuzz run table_ops

#![no_main]

use csvsplice::{CsvTable, MemoryStore};
use libfuzzer_sys::fuzz_target;

const CELLS: [&str; 4] = ["", "x", "value", "a longer cell"];

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());
    let (seed, ops) = rest.split_at(split);

    let Ok(mut table) = CsvTable::open(MemoryStore::from_bytes(seed)) else {
        return;
    };

    for op in ops.chunks_exact(3) {
        let row = u32::from(op[1] % 12);
        let column = u32::from(op[2] % 8);
        let text = CELLS[usize::from(op[0] >> 4) % CELLS.len()];

        let result = match op[0] % 8 {
            0 => table.write_item(row, column, text),
            1 => table.write_row(row, text),
            2 => table.write_column(column, "p\r\nq"),
            3 => table.delete_row(row),
            4 => table.delete_column(column),
            5 => table.delete_item(row, column),
            6 => table.read_item(row, column).map(drop),
            _ => table.read_column(column).map(drop),
        };
        if result.is_err() {
            continue;
        }

        if table.rescan().is_err() {
            return;
        }
    }
});
