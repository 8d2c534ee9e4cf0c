//! Byte-addressable stores that hold the table's stream.
//!
//! The editor never holds the table in memory. Everything it does goes through
//! the narrow [`ByteStore`] interface: cursor-based `read`/`write`/`seek`, plus
//! `insert` and `delete` primitives that physically shift every byte after the
//! edit point. A store may be a local file, a buffer, or a file on a remote
//! module reached over a serial bus.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] keeps the stream in a `Vec<u8>`;
//! - [`FileStore`] edits a local file in place with a bounded copy buffer.
//!
//! # Primitive semantics
//!
//! - offsets are `u32`, so streams are limited to 4 GiB;
//! - `read` returns `Ok(0)` at end of stream;
//! - `write` overwrites at the cursor and extends the stream when it runs past
//!   the end;
//! - `insert(pos, ..)` requires `pos <= size` and leaves the cursor at
//!   `pos + count`;
//! - `delete(pos, n, Direction::Before)` removes `[pos - n, pos)` and leaves the
//!   cursor at `pos - n`; `Direction::After` removes `[pos, pos + n)` and leaves
//!   the cursor at `pos`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

/// Which side of the edit point a [`ByteStore::delete`] removes bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Remove the bytes that precede the position.
    Before,
    /// Remove the bytes that follow the position.
    After,
}

impl Direction {
    /// Returns the half-open range removed by deleting `count` bytes at `pos`,
    /// or `None` when it would underflow or run past `size`.
    pub fn range(self, pos: u32, count: u32, size: u32) -> Option<(u32, u32)> {
        if pos > size {
            return None;
        }
        match self {
            Direction::Before => pos.checked_sub(count).map(|start| (start, pos)),
            Direction::After => pos
                .checked_add(count)
                .filter(|&end| end <= size)
                .map(|end| (pos, end)),
        }
    }
}

/// Random-access byte stream with physical insert and delete.
///
/// All primitives are synchronous. Implementations backed by a remote device
/// are expected to apply their own bounded timeout and report expiry as an
/// error; the editor never retries.
pub trait ByteStore {
    /// Reads up to `buf.len()` bytes at the cursor, advancing it.
    ///
    /// Returns `Ok(0)` at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes `buf` at the cursor, overwriting existing bytes and extending
    /// the stream past its end if needed.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Moves the cursor to `pos`. Positions past the end are rejected.
    fn seek(&mut self, pos: u32) -> Result<()>;

    /// Current cursor position.
    fn position(&self) -> u32;

    /// Current stream size in bytes.
    fn size(&self) -> u32;

    /// Inserts `count` copies of `fill` at `pos`, shifting the tail forward.
    fn insert_fill(&mut self, pos: u32, fill: u8, count: u32) -> Result<()>;

    /// Inserts `bytes` at `pos`, shifting the tail forward.
    fn insert_bytes(&mut self, pos: u32, bytes: &[u8]) -> Result<()>;

    /// Removes `count` bytes on the given side of `pos`, shifting the tail
    /// back.
    fn delete(&mut self, pos: u32, count: u32, direction: Direction) -> Result<()>;

    /// Returns true while the store can be read and written.
    fn is_open(&self) -> bool;

    /// Returns true if the store refers to a directory rather than a file.
    fn is_directory(&self) -> bool;

    /// Closes the store. Every later primitive fails.
    fn close(&mut self) -> Result<()>;

    /// Reads one byte without moving the cursor.
    fn peek(&mut self) -> Result<Option<u8>> {
        let pos = self.position();
        let mut byte = [0u8; 1];
        if self.read(&mut byte)? == 0 {
            return Ok(None);
        }
        self.seek(pos)?;
        Ok(Some(byte[0]))
    }

    /// Number of bytes between the cursor and the end of the stream.
    fn available(&self) -> u32 {
        self.size().saturating_sub(self.position())
    }

    /// Pushes buffered writes to the backing medium.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, pos: u32) -> Result<()> {
        (**self).seek(pos)
    }

    fn position(&self) -> u32 {
        (**self).position()
    }

    fn size(&self) -> u32 {
        (**self).size()
    }

    fn insert_fill(&mut self, pos: u32, fill: u8, count: u32) -> Result<()> {
        (**self).insert_fill(pos, fill, count)
    }

    fn insert_bytes(&mut self, pos: u32, bytes: &[u8]) -> Result<()> {
        (**self).insert_bytes(pos, bytes)
    }

    fn delete(&mut self, pos: u32, count: u32, direction: Direction) -> Result<()> {
        (**self).delete(pos, count, direction)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn is_directory(&self) -> bool {
        (**self).is_directory()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        (**self).peek()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
