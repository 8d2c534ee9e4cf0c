//! Integration tests for editing tables stored in local files.

mod common;

use std::fs;

use common::REFERENCE_TABLE;
use csvsplice::{ByteStore, CsvTable, Error, FileStore, TableShape};
use tempfile::TempDir;

fn table_file(content: &[u8]) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_edits_persist_after_close() {
    let (_dir, path) = table_file(REFERENCE_TABLE);

    let mut table = CsvTable::open(FileStore::open(&path).unwrap()).unwrap();
    assert_eq!(table.shape(), TableShape { rows: 3, columns: 3 });
    table.write_item(2, 2, "grown").unwrap();
    table.delete_item(3, 1).unwrap();
    table.write_row(5, "new").unwrap();
    table.into_store().unwrap().close().unwrap();

    assert_eq!(
        fs::read(&path).unwrap(),
        b"a,b\r\nc,grown\r\n,e,f\r\n\r\nnew\r\n".to_vec()
    );
}

#[test]
fn test_reopen_sees_previous_edits() {
    let (_dir, path) = table_file(b"");
    {
        let mut table = CsvTable::open(FileStore::open(&path).unwrap()).unwrap();
        table.write_column(1, "x\r\ny\r\nz").unwrap();
        table.into_store().unwrap().close().unwrap();
    }

    let mut table = CsvTable::open(FileStore::open(&path).unwrap()).unwrap();
    assert_eq!(table.shape(), TableShape { rows: 3, columns: 1 });
    assert_eq!(table.read_column(1).unwrap(), "x\r\ny\r\nz\r\n");
}

#[test]
fn test_large_cells_cross_shift_buffer() {
    let (_dir, path) = table_file(REFERENCE_TABLE);
    let long = "w".repeat(2000);

    let mut table = CsvTable::open(FileStore::open(&path).unwrap()).unwrap();
    table.write_item(1, 1, &long).unwrap();
    assert_eq!(table.read_item(1, 1).unwrap(), long);
    assert_eq!(table.read_item(3, 3).unwrap(), "f");

    table.write_item(1, 1, "a").unwrap();
    table.into_store().unwrap().close().unwrap();
    assert_eq!(fs::read(&path).unwrap(), REFERENCE_TABLE);
}

#[test]
fn test_value_writer_on_file() {
    let (_dir, path) = table_file(b"time,value");
    let mut table = CsvTable::open(FileStore::open(&path).unwrap()).unwrap();
    let mut writer = table.append().unwrap();
    writer.value("t1").unwrap().float(1.5, 1).unwrap();
    writer.finish().unwrap();
    table.into_store().unwrap().close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"time,value\r\nt1,1.5\r\n");
}

#[test]
fn test_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let err = CsvTable::open(store).unwrap_err();
    assert!(matches!(err, Error::IsDirectory));
    assert_eq!(err.status_code(), Some(3));
}

#[test]
fn test_closed_file_is_not_open() {
    let (_dir, path) = table_file(REFERENCE_TABLE);
    let mut store = FileStore::open(&path).unwrap();
    store.close().unwrap();
    let err = CsvTable::open(store).unwrap_err();
    assert!(matches!(err, Error::NotOpen));
    assert!(err.is_initialization_error());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileStore::open(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_create_truncates() {
    let (_dir, path) = table_file(REFERENCE_TABLE);
    let table = CsvTable::open(FileStore::create(&path).unwrap()).unwrap();
    assert!(table.shape().is_empty());
}
