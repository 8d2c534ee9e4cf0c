//! Integration tests for structure scanning and the delimiter state machine.

mod common;

use common::{REFERENCE_TABLE, reference_shape};
use csvsplice::scan::{Action, ByteClass, LexState, Lexer};
use csvsplice::{ByteStore, CsvTable, LineEndings, MemoryStore, TableConfig, TableShape};

fn shape_with(bytes: &[u8], config: TableConfig) -> TableShape {
    CsvTable::open_with_config(MemoryStore::from_bytes(bytes), config)
        .unwrap()
        .shape()
}

#[test]
fn test_reference_table_shape() {
    assert_eq!(
        shape_with(REFERENCE_TABLE, TableConfig::default()),
        TableShape { rows: 3, columns: 3 }
    );
}

#[test]
fn test_shapes_match_reference_split() {
    let cases: &[&[u8]] = &[
        b"",
        b"\r\n",
        b"a",
        b",",
        b"a,b,c,d",
        b"a\r\n\r\n\r\nb,c",
        b"x\ry,z\r\n",
        b"1,2\n3,4\r\n",
        b"\r\r\n,,\r\n",
        b"trailing cr\r",
    ];
    for &case in cases {
        assert_eq!(
            shape_with(case, TableConfig::default()),
            reference_shape(case),
            "input {:?}",
            String::from_utf8_lossy(case)
        );
    }
}

#[test]
fn test_every_scratch_length_agrees() {
    let input = b"alpha,beta\r\ngamma\r\n\r\ndelta,epsilon,zeta\r\neta";
    let expected = reference_shape(input);
    for len in 2..=input.len() + 1 {
        let config = TableConfig::new().scratch_len(len);
        assert_eq!(shape_with(input, config), expected, "scratch {len}");
    }
}

#[test]
fn test_lenient_line_endings() {
    let input = b"a\nb,c\r\nd\n";
    assert_eq!(
        shape_with(input, TableConfig::default()),
        TableShape { rows: 2, columns: 2 }
    );
    assert_eq!(
        shape_with(input, TableConfig::new().line_endings(LineEndings::LenientLf)),
        TableShape { rows: 3, columns: 2 }
    );
}

#[test]
fn test_scan_restores_cursor() {
    let mut store = MemoryStore::from_bytes(REFERENCE_TABLE);
    store.seek(7).unwrap();
    let table = CsvTable::open(store).unwrap();
    assert_eq!(table.store().unwrap().position(), 7);
}

#[test]
fn test_scan_does_not_modify_stream() {
    let mut table = CsvTable::open(MemoryStore::from_bytes(REFERENCE_TABLE)).unwrap();
    table.rescan().unwrap();
    assert_eq!(table.store().unwrap().as_bytes(), REFERENCE_TABLE);
}

#[test]
fn test_rescan_after_direct_edit() {
    let mut table = CsvTable::open(MemoryStore::from_bytes(b"a\r\n")).unwrap();
    let store = table.store_mut().unwrap();
    let end = store.size();
    store.insert_bytes(end, b"b,c\r\n").unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rescan().unwrap(), TableShape { rows: 2, columns: 2 });
}

#[test]
fn test_lexer_states() {
    let mut lexer = Lexer::new(LineEndings::CrLf);
    assert_eq!(lexer.state(), LexState::AtRowEnd);

    assert_eq!(lexer.feed_byte(b'a'), Action::None);
    assert_eq!(lexer.state(), LexState::InCell);
    assert_eq!(lexer.feed_byte(b','), Action::CellBreak);
    assert_eq!(lexer.feed_byte(b'\r'), Action::None);
    assert_eq!(lexer.state(), LexState::AfterCr);
    assert_eq!(lexer.feed_byte(b'\n'), Action::RowBreak(2));
    assert_eq!(lexer.state(), LexState::AtRowEnd);

    assert!(!lexer.finish());
    assert_eq!(lexer.state(), LexState::AtEof);
    assert_eq!(lexer.feed(ByteClass::Other), Action::None);
}

#[test]
fn test_lexer_lone_cr_is_content() {
    let mut lexer = Lexer::new(LineEndings::CrLf);
    for &b in b"x\ry" {
        assert_eq!(lexer.feed_byte(b), Action::None);
    }
    assert_eq!(lexer.state(), LexState::InCell);
    assert!(lexer.finish());
}
