//! This module defines the `Tape`, an unbounded two-directional strip of squares addressed by
//! an integer cursor.
//!
//! The strip is stored as two growable halves: `right` holds positions `0, 1, 2, ...` and
//! `left` holds positions `-1, -2, -3, ...` (index `0` is position `-1`). A half doubles in
//! length whenever a write lands past its end; reads and cursor moves never allocate.

use crate::parser::parse_tape;
use crate::types::{Action, Symbol, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A square on the tape. `None` marks a square that was never written, which is kept
/// apart from an explicitly erased square so that snapshots restore the tape exactly.
pub type Cell = Option<Symbol>;

/// Unbounded bidirectional tape of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cursor: i64,
    right: Vec<Cell>,
    left: Vec<Cell>,
}

/// Where a cursor position lives in the backing storage.
enum Slot {
    Right(usize),
    Left(usize),
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Creates an entirely blank tape with the cursor at position `0`.
    pub fn new() -> Self {
        Self {
            cursor: 0,
            right: vec![None],
            left: vec![None],
        }
    }

    /// Rebuilds a tape from its raw parts, as found in an encoded snapshot.
    ///
    /// Empty halves are padded to a single never-written square.
    pub fn from_parts(cursor: i64, mut right: Vec<Cell>, mut left: Vec<Cell>) -> Self {
        if right.is_empty() {
            right.push(None);
        }
        if left.is_empty() {
            left.push(None);
        }

        Self {
            cursor,
            right,
            left,
        }
    }

    /// Decodes a tape from the text produced by [`Tape::encode`].
    pub fn decode(encoded: &str) -> Result<Self, TuringMachineError> {
        parse_tape(encoded)
    }

    /// Returns the current cursor position.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Returns the squares at positions `0, 1, 2, ...` that have backing storage.
    pub fn right(&self) -> &[Cell] {
        &self.right
    }

    /// Returns the squares at positions `-1, -2, -3, ...` that have backing storage.
    pub fn left(&self) -> &[Cell] {
        &self.left
    }

    fn slot(&self) -> Slot {
        if self.cursor >= 0 {
            Slot::Right(self.cursor as usize)
        } else {
            Slot::Left((-(self.cursor + 1)) as usize)
        }
    }

    /// Reads the symbol under the cursor. Squares outside the backing storage are blank.
    pub fn read(&self) -> Symbol {
        let cell = match self.slot() {
            Slot::Right(index) => self.right.get(index),
            Slot::Left(index) => self.left.get(index),
        };

        cell.copied().flatten().unwrap_or(Symbol::Blank)
    }

    /// Writes `symbol` under the cursor, growing the backing storage first if needed.
    pub fn print(&mut self, symbol: Symbol) {
        let cell = match self.slot() {
            Slot::Right(index) => grow_to_cover(&mut self.right, index),
            Slot::Left(index) => grow_to_cover(&mut self.left, index),
        };

        *cell = Some(symbol);
    }

    /// Blanks the square under the cursor.
    pub fn erase(&mut self) {
        self.print(Symbol::Blank);
    }

    /// Moves the cursor `steps` squares to the right. Negative steps move left.
    ///
    /// The cursor stops at the ends of the `i64` range instead of wrapping around.
    pub fn forward(&mut self, steps: i64) {
        self.cursor = self.cursor.saturating_add(steps);
    }

    /// Moves the cursor `steps` squares to the left. Negative steps move right.
    pub fn backward(&mut self, steps: i64) {
        self.cursor = self.cursor.saturating_sub(steps);
    }

    /// Applies a single action to the tape.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveForward(steps) => self.forward(steps),
            Action::MoveBackward(steps) => self.backward(steps),
            Action::Write(c) => self.print(Symbol::Mark(c)),
            Action::Erase => self.erase(),
            Action::NoOp => {}
        }
    }

    /// Concatenates every printed symbol from the leftmost to the rightmost square,
    /// skipping blanks entirely.
    ///
    /// This is a lossy view meant for output; use [`Tape::encode`] to persist a tape.
    pub fn contents_as_string(&self) -> String {
        let marks = |cells: &[Cell]| -> Vec<char> {
            cells
                .iter()
                .filter_map(|&cell| cell.and_then(Symbol::as_char))
                .collect()
        };

        marks(&self.left)
            .into_iter()
            .rev()
            .chain(marks(&self.right))
            .collect()
    }

    /// Encodes the cursor and both storage halves as `(cursor, [right], [left])`.
    ///
    /// Squares are written as `'c'` for a printed character, `_` for an erased square,
    /// and `.` for a square that was never written.
    pub fn encode(&self) -> String {
        format!(
            "({}, {}, {})",
            self.cursor,
            encode_cells(&self.right),
            encode_cells(&self.left)
        )
    }
}

/// Doubles `cells` until `index` is in range, then returns the square at `index`.
fn grow_to_cover(cells: &mut Vec<Cell>, index: usize) -> &mut Cell {
    if index >= cells.len() {
        let mut len = cells.len().max(1);
        while index >= len {
            len *= 2;
        }
        cells.resize(len, None);
    }

    &mut cells[index]
}

fn encode_cells(cells: &[Cell]) -> String {
    let items = cells
        .iter()
        .map(|cell| match cell {
            None => ".".to_string(),
            Some(Symbol::Blank) => "_".to_string(),
            Some(Symbol::Mark('\'')) => "\"'\"".to_string(),
            Some(Symbol::Mark(c)) => format!("'{c}'"),
        })
        .collect::<Vec<_>>();

    format!("[{}]", items.join(", "))
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Tape {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
