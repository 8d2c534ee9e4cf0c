//! Splice engine.
//!
//! Every mutation of the table ends up here. [`splice`] replaces the bytes of
//! a span with a replacement of any length: the span is first grown with
//! space filler or shrunk by deleting its excess, then the replacement is
//! written over it. The remaining helpers create structure that does not
//! exist yet (missing rows, missing cells) so that a span can be located.
//!
//! Nothing here is transactional. If the store fails between the resize and
//! the write, the span is left resized with its old content.

use std::ops::ControlFlow;

use crate::locate::Span;
use crate::scan::{Anchor, Event, Walker};
use crate::store::{ByteStore, Direction};
use crate::{Error, Result};

/// Sixteen empty rows, written in one go when a table is extended.
const EMPTY_ROWS: &[u8] = b"\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n\r\n";

/// Row terminator written by the editor.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Filler byte used to grow a span before it is overwritten.
const GROW_FILL: u8 = b' ';

/// How a splice changed the stream length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceDelta {
    /// Replacement had the span's length.
    Unchanged,
    /// The stream grew by this many bytes.
    Grew(u32),
    /// The stream shrank by this many bytes.
    Shrank(u32),
}

impl SpliceDelta {
    fn between(old: u32, new: u32) -> Self {
        match new.cmp(&old) {
            std::cmp::Ordering::Equal => SpliceDelta::Unchanged,
            std::cmp::Ordering::Greater => SpliceDelta::Grew(new - old),
            std::cmp::Ordering::Less => SpliceDelta::Shrank(old - new),
        }
    }
}

/// Writes all of `bytes` at the cursor.
pub(crate) fn write_all<S: ByteStore + ?Sized>(store: &mut S, bytes: &[u8]) -> Result<()> {
    let written = store.write(bytes)?;
    if written != bytes.len() {
        return Err(Error::store(
            "write",
            format!("wrote {} of {} bytes", written, bytes.len()),
        ));
    }
    Ok(())
}

/// Replaces the bytes in `span` with `replacement`.
pub(crate) fn splice<S: ByteStore + ?Sized>(
    store: &mut S,
    span: Span,
    replacement: &[u8],
) -> Result<SpliceDelta> {
    let new_len = u32::try_from(replacement.len())
        .map_err(|_| Error::store("write", "replacement exceeds 4 GiB"))?;
    let delta = SpliceDelta::between(span.len(), new_len);
    log::trace!(
        "splice [{}, {}) with {} bytes: {:?}",
        span.start,
        span.end,
        new_len,
        delta
    );

    match delta {
        SpliceDelta::Unchanged => {
            store.seek(span.start)?;
            write_all(store, replacement)?;
        }
        SpliceDelta::Shrank(excess) => {
            store.seek(span.start)?;
            write_all(store, replacement)?;
            store.delete(span.end, excess, Direction::Before)?;
        }
        SpliceDelta::Grew(missing) => {
            store.insert_fill(span.end, GROW_FILL, missing)?;
            store.seek(span.start)?;
            write_all(store, replacement)?;
        }
    }
    Ok(delta)
}

/// Removes the bytes in `span`.
pub(crate) fn remove<S: ByteStore + ?Sized>(store: &mut S, span: Span) -> Result<()> {
    if span.is_empty() {
        return Ok(());
    }
    log::trace!("remove [{}, {})", span.start, span.end);
    store.delete(span.end, span.len(), Direction::Before)
}

/// Inserts `count` commas at `at`, turning a short row into one with more
/// (empty) cells.
pub(crate) fn pad_cells<S: ByteStore + ?Sized>(store: &mut S, at: u32, count: u32) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    log::debug!("padding row with {count} empty cells at offset {at}");
    store.insert_fill(at, b',', count)
}

/// Appends `count` empty rows at the end of the stream.
///
/// The last existing row must already be terminated.
pub(crate) fn append_empty_rows<S: ByteStore + ?Sized>(store: &mut S, count: u32) -> Result<()> {
    let end = store.size();
    store.seek(end)?;
    let rows_per_batch = (EMPTY_ROWS.len() / CRLF.len()) as u32;
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(rows_per_batch);
        write_all(store, &EMPTY_ROWS[..(n as usize) * CRLF.len()])?;
        remaining -= n;
    }
    Ok(())
}

/// Terminates an unterminated final row. Returns true if a terminator was
/// written.
pub(crate) fn terminate_last_row<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
) -> Result<bool> {
    if walker.ends_with_terminator(store)? {
        return Ok(false);
    }
    let end = store.size();
    store.seek(end)?;
    write_all(store, CRLF)?;
    Ok(true)
}

/// Counts rows, stopping as soon as `row` is seen.
pub(crate) fn count_rows_up_to<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
    row: u32,
) -> Result<u32> {
    let mut seen = 0;
    walker.walk(store, Anchor::ORIGIN, |event| {
        if let Event::Row { row: r, .. } = event {
            seen = r;
            if r >= row {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    })?;
    Ok(seen)
}

/// Makes sure row `row` exists, appending empty CRLF-terminated rows after a
/// terminated last row if needed. Returns the number of rows appended.
pub(crate) fn ensure_row<S: ByteStore + ?Sized>(
    store: &mut S,
    walker: &mut Walker<'_>,
    row: u32,
) -> Result<u32> {
    let existing = count_rows_up_to(store, walker, row)?;
    if existing >= row {
        return Ok(0);
    }
    if terminate_last_row(store, walker)? {
        log::debug!("terminated unterminated row {existing}");
    }
    let missing = row - existing;
    log::debug!("appending {missing} rows after row {existing}");
    append_empty_rows(store, missing)?;
    Ok(missing)
}
