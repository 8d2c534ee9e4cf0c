//! Delimiter state machine.
//!
//! Every scan in the crate classifies bytes through this machine. It has four
//! states and five input classes, and each `(state, class)` pair maps to
//! exactly one [`Transition`] in a static table. Nothing looks ahead: a `\r`
//! moves to [`LexState::AfterCr`] and only the very next byte decides whether
//! it was half of a row terminator or ordinary content.

use crate::config::LineEndings;

/// Position of the machine relative to the table structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Inside a row, after at least one byte of it.
    InCell,
    /// The previous byte was `\r`.
    AfterCr,
    /// At the start of a row: the stream start or right after a terminator.
    AtRowEnd,
    /// End of stream consumed. Terminal.
    AtEof,
}

/// Input classes. `End` is fed once after the last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// `,`
    Comma,
    /// `\r`
    Cr,
    /// `\n`
    Lf,
    /// Any other byte.
    Other,
    /// End of stream.
    End,
}

impl ByteClass {
    /// Classifies one stream byte.
    #[inline]
    pub fn of(byte: u8) -> Self {
        match byte {
            b',' => ByteClass::Comma,
            b'\r' => ByteClass::Cr,
            b'\n' => ByteClass::Lf,
            _ => ByteClass::Other,
        }
    }

    const fn index(self) -> usize {
        match self {
            ByteClass::Comma => 0,
            ByteClass::Cr => 1,
            ByteClass::Lf => 2,
            ByteClass::Other => 3,
            ByteClass::End => 4,
        }
    }
}

/// Structural effect of consuming one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Content byte, or a `\r` whose meaning is not known yet.
    None,
    /// The byte was a cell separator.
    CellBreak,
    /// The byte completed a row terminator of the given length (1 or 2).
    RowBreak(u8),
    /// End of stream. `open_row` is true when an unterminated row is pending.
    Finish { open_row: bool },
}

/// Next state and the action to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: LexState,
    pub action: Action,
}

const fn t(next: LexState, action: Action) -> Transition {
    Transition { next, action }
}

use Action::{CellBreak, Finish, RowBreak};
use LexState::{AfterCr, AtEof, AtRowEnd, InCell};

const STAY: Action = Action::None;

/// Columns: Comma, Cr, Lf, Other, End.
type Table = [[Transition; 5]; 4];

const CRLF_TABLE: Table = [
    // InCell
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(InCell, STAY),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: true }),
    ],
    // AfterCr
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(AtRowEnd, RowBreak(2)),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: true }),
    ],
    // AtRowEnd
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(InCell, STAY),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: false }),
    ],
    // AtEof
    [
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
    ],
];

const LENIENT_TABLE: Table = [
    // InCell
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(AtRowEnd, RowBreak(1)),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: true }),
    ],
    // AfterCr
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(AtRowEnd, RowBreak(2)),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: true }),
    ],
    // AtRowEnd
    [
        t(InCell, CellBreak),
        t(AfterCr, STAY),
        t(AtRowEnd, RowBreak(1)),
        t(InCell, STAY),
        t(AtEof, Finish { open_row: false }),
    ],
    // AtEof
    [
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
        t(AtEof, STAY),
    ],
];

/// Delimiter state machine driven by a static transition table.
#[derive(Debug, Clone)]
pub struct Lexer {
    state: LexState,
    table: &'static Table,
}

impl Lexer {
    /// Creates a machine positioned at the start of a row.
    pub fn new(endings: LineEndings) -> Self {
        let table = match endings {
            LineEndings::CrLf => &CRLF_TABLE,
            LineEndings::LenientLf => &LENIENT_TABLE,
        };
        Self {
            state: AtRowEnd,
            table,
        }
    }

    /// Current state.
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Consumes one input and returns the resulting action.
    #[inline]
    pub fn feed(&mut self, class: ByteClass) -> Action {
        let row = match self.state {
            InCell => 0,
            AfterCr => 1,
            AtRowEnd => 2,
            AtEof => 3,
        };
        let transition = self.table[row][class.index()];
        self.state = transition.next;
        transition.action
    }

    /// Consumes one stream byte.
    #[inline]
    pub fn feed_byte(&mut self, byte: u8) -> Action {
        self.feed(ByteClass::of(byte))
    }

    /// Signals end of stream. Returns whether an unterminated row is pending.
    pub fn finish(&mut self) -> bool {
        matches!(self.feed(ByteClass::End), Finish { open_row: true })
    }
}
