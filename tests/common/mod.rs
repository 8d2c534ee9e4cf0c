//! Shared test utilities for integration tests.
//!
//! This module provides table fixtures, a naive reference scanner and a store
//! wrapper that injects failures into chosen primitives.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io;

use csvsplice::{ByteStore, CsvTable, Direction, Error, MemoryStore, Result, TableShape};

/// The table used throughout the documentation: 3 rows, widest row 3 cells.
pub const REFERENCE_TABLE: &[u8] = b"a,b\r\nc\r\nd,e,f\r\n";

/// Opens a table over an in-memory copy of `bytes`.
pub fn table_from(bytes: &[u8]) -> CsvTable<MemoryStore> {
    CsvTable::open(MemoryStore::from_bytes(bytes)).expect("in-memory table opens")
}

/// Current stream contents of an in-memory table.
pub fn contents(table: &CsvTable<MemoryStore>) -> Vec<u8> {
    table
        .store()
        .expect("store attached")
        .as_bytes()
        .to_vec()
}

/// Builds CRLF-terminated table bytes from rows of cells.
pub fn build_table(rows: &[&[&str]]) -> Vec<u8> {
    let mut out = Vec::new();
    for row in rows {
        out.extend_from_slice(row.join(",").as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// Shape computed by splitting on CRLF, independent of the crate's scanner.
pub fn reference_shape(bytes: &[u8]) -> TableShape {
    let mut rows: Vec<&[u8]> = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'\r' && bytes[i + 1] == b'\n' {
            rows.push(&bytes[start..i]);
            start = i + 2;
            i += 2;
        } else {
            i += 1;
        }
    }
    if start < bytes.len() {
        rows.push(&bytes[start..]);
    }

    TableShape {
        rows: rows.len() as u32,
        columns: rows
            .iter()
            .map(|r| r.iter().filter(|&&b| b == b',').count() as u32 + 1)
            .max()
            .unwrap_or(0),
    }
}

/// Store primitives that [`FaultyStore`] can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
    Seek,
    Insert,
    Delete,
}

impl Op {
    fn index(self) -> usize {
        self as usize
    }
}

/// A [`MemoryStore`] wrapper that fails the n-th call to a chosen primitive,
/// or delivers short reads.
#[derive(Debug)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    fault: Option<(Op, u32)>,
    calls: [u32; 5],
    short_reads: bool,
}

impl FaultyStore {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            inner: MemoryStore::from_bytes(bytes),
            fault: None,
            calls: [0; 5],
            short_reads: false,
        }
    }

    /// Fails the `nth` (1-based) call to `op`, counted from now.
    pub fn fail_nth(mut self, op: Op, nth: u32) -> Self {
        self.calls = [0; 5];
        self.fault = Some((op, nth));
        self
    }

    /// Arms a fault on an already attached store.
    pub fn arm(&mut self, op: Op, nth: u32) {
        self.calls = [0; 5];
        self.fault = Some((op, nth));
    }

    /// Makes every read of more than one byte deliver one byte less.
    pub fn short_reads(mut self) -> Self {
        self.short_reads = true;
        self
    }

    pub fn calls(&self, op: Op) -> u32 {
        self.calls[op.index()]
    }

    fn hit(&mut self, op: Op) -> Result<()> {
        self.calls[op.index()] += 1;
        match self.fault {
            Some((fault, nth)) if fault == op && self.calls[op.index()] == nth => Err(Error::Io(
                io::Error::other(format!("injected {op:?} fault")),
            )),
            _ => Ok(()),
        }
    }
}

impl ByteStore for FaultyStore {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.hit(Op::Read)?;
        if self.short_reads && buf.len() > 1 {
            let n = buf.len() - 1;
            return self.inner.read(&mut buf[..n]);
        }
        self.inner.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.hit(Op::Write)?;
        self.inner.write(buf)
    }

    fn seek(&mut self, pos: u32) -> Result<()> {
        self.hit(Op::Seek)?;
        self.inner.seek(pos)
    }

    fn position(&self) -> u32 {
        self.inner.position()
    }

    fn size(&self) -> u32 {
        self.inner.size()
    }

    fn insert_fill(&mut self, pos: u32, fill: u8, count: u32) -> Result<()> {
        self.hit(Op::Insert)?;
        self.inner.insert_fill(pos, fill, count)
    }

    fn insert_bytes(&mut self, pos: u32, bytes: &[u8]) -> Result<()> {
        self.hit(Op::Insert)?;
        self.inner.insert_bytes(pos, bytes)
    }

    fn delete(&mut self, pos: u32, count: u32, direction: Direction) -> Result<()> {
        self.hit(Op::Delete)?;
        self.inner.delete(pos, count, direction)
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn is_directory(&self) -> bool {
        self.inner.is_directory()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
