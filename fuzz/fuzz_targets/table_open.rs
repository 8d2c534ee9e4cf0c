//! Fuzz target for scanning arbitrary bytes as a table.
//!
//! Run with: cargo +nightly fuzz run table_open

#![no_main]

use csvsplice::{CsvTable, LineEndings, MemoryStore, TableConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for endings in [LineEndings::CrLf, LineEndings::LenientLf] {
        let config = TableConfig::new().line_endings(endings).scratch_len(7);
        let Ok(mut table) = CsvTable::open_with_config(MemoryStore::from_bytes(data), config)
        else {
            continue;
        };

        // Every counted row must be readable.
        for row in 1..=table.row_count().min(64) {
            let _ = table.read_row(row);
        }
        for column in 1..=table.column_count().min(26) {
            let _ = table.read_column(column);
        }
    }
});
