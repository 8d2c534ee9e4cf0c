//! Local file store.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{ByteStore, Direction};
use crate::{Error, Result};

/// Size of the stack buffer used to shift file tails on insert and delete.
const SHIFT_CHUNK: usize = 512;

/// A [`ByteStore`] that edits a local file in place.
///
/// `insert` and `delete` shift the file tail through a fixed-size buffer, so
/// memory use stays constant regardless of file size. Size and cursor are
/// tracked locally to keep `size()`/`position()` infallible.
///
/// # Example
///
/// ```rust,no_run
/// use csvsplice::{CsvTable, FileStore};
///
/// let store = FileStore::open("log.csv")?;
/// let mut table = CsvTable::open(store)?;
/// table.write_item(2, 3, "42")?;
/// # Ok::<(), csvsplice::Error>(())
/// ```
#[derive(Debug)]
pub struct FileStore {
    file: Option<File>,
    size: u32,
    pos: u32,
    directory: bool,
}

impl FileStore {
    /// Opens an existing file for reading and writing.
    ///
    /// Opening a directory succeeds and yields a store whose
    /// [`is_directory`](ByteStore::is_directory) returns true, so that the
    /// editor can reject it with a precise error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.metadata()?.is_dir() {
            return Ok(Self {
                file: None,
                size: 0,
                pos: 0,
                directory: true,
            });
        }
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file)
    }

    /// Creates (or truncates) a file and opens it for reading and writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::from_file(file)
    }

    /// Wraps an already opened file. The file must be readable and writable.
    pub fn from_file(mut file: File) -> Result<Self> {
        let len = file.metadata()?.len();
        let size = u32::try_from(len)
            .map_err(|_| Error::store("open", format!("file of {len} bytes exceeds 4 GiB")))?;
        file.seek(SeekFrom::Start(0))?;
        Ok(Self {
            file: Some(file),
            size,
            pos: 0,
            directory: false,
        })
    }

    fn file(&mut self, op: &'static str) -> Result<&mut File> {
        if self.directory {
            return Err(Error::store(op, "store is a directory"));
        }
        self.file
            .as_mut()
            .ok_or_else(|| Error::store(op, "store is closed"))
    }

    fn grow_check(&self, op: &'static str, extra: u64) -> Result<u32> {
        u32::try_from(self.size as u64 + extra)
            .map_err(|_| Error::store(op, "stream would exceed 4 GiB"))
    }

    /// Moves `[from, from + len)` to `to`, walking backwards so an overlapping
    /// move towards the end is safe.
    fn shift_tail_forward(file: &mut File, from: u32, to: u32, len: u32) -> Result<()> {
        let mut buf = [0u8; SHIFT_CHUNK];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(SHIFT_CHUNK as u32);
            remaining -= n;
            file.seek(SeekFrom::Start((from + remaining) as u64))?;
            file.read_exact(&mut buf[..n as usize])?;
            file.seek(SeekFrom::Start((to + remaining) as u64))?;
            file.write_all(&buf[..n as usize])?;
        }
        Ok(())
    }

    /// Moves `[from, from + len)` to `to` with `to < from`, walking forwards.
    fn shift_tail_back(file: &mut File, from: u32, to: u32, len: u32) -> Result<()> {
        let mut buf = [0u8; SHIFT_CHUNK];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(SHIFT_CHUNK as u32);
            file.seek(SeekFrom::Start((from + done) as u64))?;
            file.read_exact(&mut buf[..n as usize])?;
            file.seek(SeekFrom::Start((to + done) as u64))?;
            file.write_all(&buf[..n as usize])?;
            done += n;
        }
        Ok(())
    }

    /// Opens a gap of `count` bytes at `pos`.
    fn open_gap(&mut self, pos: u32, count: u32) -> Result<()> {
        if pos > self.size {
            return Err(Error::store(
                "insert",
                format!("position {} past end {}", pos, self.size),
            ));
        }
        let new_size = self.grow_check("insert", count as u64)?;
        let size = self.size;
        let file = self.file("insert")?;
        file.set_len(new_size as u64)?;
        Self::shift_tail_forward(file, pos, pos + count, size - pos)?;
        self.size = new_size;
        Ok(())
    }
}

impl ByteStore for FileStore {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let pos = self.pos;
        let file = self.file("read")?;
        file.seek(SeekFrom::Start(pos as u64))?;
        let mut total = 0;
        while total < buf.len() {
            let n = file.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        self.pos += total as u32;
        Ok(total)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let pos = self.pos;
        let end = u32::try_from(pos as u64 + buf.len() as u64)
            .map_err(|_| Error::store("write", "stream would exceed 4 GiB"))?;
        let file = self.file("write")?;
        file.seek(SeekFrom::Start(pos as u64))?;
        file.write_all(buf)?;
        self.pos = end;
        self.size = self.size.max(end);
        Ok(buf.len())
    }

    fn seek(&mut self, pos: u32) -> Result<()> {
        if self.file.is_none() || pos > self.size {
            return Err(Error::SeekFailed { offset: pos });
        }
        self.pos = pos;
        Ok(())
    }

    fn position(&self) -> u32 {
        self.pos
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn insert_fill(&mut self, pos: u32, fill: u8, count: u32) -> Result<()> {
        self.open_gap(pos, count)?;
        let chunk = [fill; SHIFT_CHUNK];
        let file = self.file("insert")?;
        file.seek(SeekFrom::Start(pos as u64))?;
        let mut remaining = count as usize;
        while remaining > 0 {
            let n = remaining.min(SHIFT_CHUNK);
            file.write_all(&chunk[..n])?;
            remaining -= n;
        }
        self.pos = pos + count;
        Ok(())
    }

    fn insert_bytes(&mut self, pos: u32, bytes: &[u8]) -> Result<()> {
        let count = u32::try_from(bytes.len())
            .map_err(|_| Error::store("insert", "insertion exceeds 4 GiB"))?;
        self.open_gap(pos, count)?;
        let file = self.file("insert")?;
        file.seek(SeekFrom::Start(pos as u64))?;
        file.write_all(bytes)?;
        self.pos = pos + count;
        Ok(())
    }

    fn delete(&mut self, pos: u32, count: u32, direction: Direction) -> Result<()> {
        let size = self.size;
        let (start, end) = direction.range(pos, count, size).ok_or_else(|| {
            Error::store(
                "delete",
                format!("{count} bytes {direction:?} {pos} outside stream of {size} bytes"),
            )
        })?;
        let file = self.file("delete")?;
        Self::shift_tail_back(file, end, start, size - end)?;
        file.set_len((size - (end - start)) as u64)?;
        self.size = size - (end - start);
        self.pos = start;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some() || self.directory
    }

    fn is_directory(&self) -> bool {
        self.directory
    }

    fn close(&mut self) -> Result<()> {
        self.directory = false;
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.file("flush")?.flush()?;
        Ok(())
    }
}
