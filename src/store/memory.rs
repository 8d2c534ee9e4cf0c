//! In-memory byte store.

use super::{ByteStore, Direction};
use crate::{Error, Result};

/// A [`ByteStore`] backed by a `Vec<u8>`.
///
/// Useful for tests and for building a table in memory before persisting it.
/// A store can also be created closed or as a directory handle to exercise
/// the editor's initialization checks.
///
/// # Example
///
/// ```rust
/// use csvsplice::{ByteStore, Direction, MemoryStore};
///
/// let mut store = MemoryStore::from_bytes(b"a,b\r\n");
/// store.insert_fill(1, b' ', 2).unwrap();
/// assert_eq!(store.as_bytes(), b"a  ,b\r\n");
/// store.delete(3, 2, Direction::Before).unwrap();
/// assert_eq!(store.as_bytes(), b"a,b\r\n");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Vec<u8>,
    pos: usize,
    open: bool,
    directory: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, open store.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            pos: 0,
            open: true,
            directory: false,
        }
    }

    /// Creates an open store holding a copy of `bytes`, cursor at 0.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            data: bytes.as_ref().to_vec(),
            ..Self::new()
        }
    }

    /// Creates a store that reports itself as not open.
    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::new()
        }
    }

    /// Creates an open store that reports itself as a directory.
    pub fn directory() -> Self {
        Self {
            directory: true,
            ..Self::new()
        }
    }

    /// Returns the stream contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the stream contents as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Consumes the store, returning its contents.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn ensure_open(&self, op: &'static str) -> Result<()> {
        if !self.open {
            return Err(Error::store(op, "store is closed"));
        }
        if self.directory {
            return Err(Error::store(op, "store is a directory"));
        }
        Ok(())
    }

    fn ensure_room(&self, op: &'static str, extra: usize) -> Result<()> {
        if self.data.len() + extra > u32::MAX as usize {
            return Err(Error::store(op, "stream would exceed 4 GiB"));
        }
        Ok(())
    }

    fn check_insert_pos(&self, pos: u32) -> Result<usize> {
        let pos = pos as usize;
        if pos > self.data.len() {
            return Err(Error::store(
                "insert",
                format!("position {} past end {}", pos, self.data.len()),
            ));
        }
        Ok(pos)
    }
}

impl ByteStore for MemoryStore {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open("read")?;
        let remaining = self.data.len().saturating_sub(self.pos);
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.ensure_open("write")?;
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.ensure_room("write", end - self.data.len())?;
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn seek(&mut self, pos: u32) -> Result<()> {
        if !self.open || pos as usize > self.data.len() {
            return Err(Error::SeekFailed { offset: pos });
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn position(&self) -> u32 {
        self.pos as u32
    }

    fn size(&self) -> u32 {
        self.data.len() as u32
    }

    fn insert_fill(&mut self, pos: u32, fill: u8, count: u32) -> Result<()> {
        self.ensure_open("insert")?;
        let at = self.check_insert_pos(pos)?;
        self.ensure_room("insert", count as usize)?;
        self.data
            .splice(at..at, std::iter::repeat_n(fill, count as usize));
        self.pos = at + count as usize;
        Ok(())
    }

    fn insert_bytes(&mut self, pos: u32, bytes: &[u8]) -> Result<()> {
        self.ensure_open("insert")?;
        let at = self.check_insert_pos(pos)?;
        self.ensure_room("insert", bytes.len())?;
        self.data.splice(at..at, bytes.iter().copied());
        self.pos = at + bytes.len();
        Ok(())
    }

    fn delete(&mut self, pos: u32, count: u32, direction: Direction) -> Result<()> {
        self.ensure_open("delete")?;
        let (start, end) = direction.range(pos, count, self.size()).ok_or_else(|| {
            Error::store(
                "delete",
                format!(
                    "{count} bytes {direction:?} {pos} outside stream of {} bytes",
                    self.data.len()
                ),
            )
        })?;
        self.data.drain(start as usize..end as usize);
        self.pos = start as usize;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn is_directory(&self) -> bool {
        self.directory
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
