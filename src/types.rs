//! This module defines the core data structures and types used throughout the interpreter,
//! including symbols, tape actions, the instruction table, and error types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The text used for the wildcard key of a symbol-keyed instruction.
pub const WILDCARD_KEY: &str = "*";

/// A symbol stored on the tape.
///
/// `Blank` is a first-class value: reading a square that was never written, or one
/// that was erased, yields `Blank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// The absence of a mark.
    Blank,
    /// A single printed character.
    Mark(char),
}

impl Symbol {
    /// Returns the printed character, or `None` for a blank square.
    pub fn as_char(self) -> Option<char> {
        match self {
            Symbol::Blank => None,
            Symbol::Mark(c) => Some(c),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Mark(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => write!(f, "blank"),
            Symbol::Mark(c) => write!(f, "'{c}'"),
        }
    }
}

/// A single tape operation that an instruction applies during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the cursor right by the given number of squares (negative moves left).
    MoveForward(i64),
    /// Move the cursor left by the given number of squares (negative moves right).
    MoveBackward(i64),
    /// Print a character under the cursor.
    Write(char),
    /// Blank the square under the cursor.
    Erase,
    /// Leave the tape untouched.
    NoOp,
}

/// The actions to apply and the state to continue in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Actions applied left to right on the same tape.
    pub actions: Vec<Action>,
    /// The state the machine moves to once the actions are applied.
    pub next_state: String,
}

/// Symbol-keyed dispatch for a single state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branches {
    /// Transitions for explicitly listed characters.
    pub symbols: HashMap<char, Transition>,
    /// Fallback used for blank squares and any character without its own entry.
    pub wildcard: Option<Transition>,
}

impl Branches {
    /// Selects the transition for the symbol read from the tape.
    pub fn select(&self, symbol: Symbol) -> Option<&Transition> {
        symbol
            .as_char()
            .and_then(|c| self.symbols.get(&c))
            .or(self.wildcard.as_ref())
    }
}

/// What a state does when the machine is in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Applied regardless of the symbol read.
    Always(Transition),
    /// Chosen by the symbol read, falling back to the wildcard entry.
    OnSymbol(Branches),
}

/// Maps every state of a program to its instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionTable {
    instructions: HashMap<String, Instruction>,
}

impl InstructionTable {
    /// Creates a table from already parsed instructions.
    pub fn new(instructions: HashMap<String, Instruction>) -> Self {
        Self { instructions }
    }

    /// Returns the instruction registered for `state`, if any.
    pub fn get(&self, state: &str) -> Option<&Instruction> {
        self.instructions.get(state)
    }

    /// Returns the number of states in the table.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the table defines no states.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates over the state names defined by the table.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.instructions.keys().map(String::as_str)
    }

    /// Finds the transition to take in `state` after reading `symbol`.
    ///
    /// # Returns
    ///
    /// * `Ok(&Transition)` for the matching (or wildcard) entry.
    /// * `Err(TuringMachineError::UnknownState)` if `state` has no instruction.
    /// * `Err(TuringMachineError::MissingWildcard)` if a symbol-keyed instruction has
    ///   neither an entry for `symbol` nor a wildcard.
    pub fn transition(&self, state: &str, symbol: Symbol) -> Result<&Transition, TuringMachineError> {
        match self.get(state) {
            None => Err(TuringMachineError::UnknownState(state.to_string())),
            Some(Instruction::Always(transition)) => Ok(transition),
            Some(Instruction::OnSymbol(branches)) => {
                branches
                    .select(symbol)
                    .ok_or_else(|| TuringMachineError::MissingWildcard {
                        state: state.to_string(),
                        symbol,
                    })
            }
        }
    }
}

/// Represents the errors that can occur while loading, running, or restoring a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The current state has no entry in the instruction table.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// A symbol-keyed instruction has no entry for the symbol read and no wildcard.
    #[error("No rule for {symbol} in state {state} and no wildcard entry")]
    MissingWildcard { state: String, symbol: Symbol },
    /// An action is neither a known operation nor a valid parameterization of one.
    #[error("Malformed action: {0}")]
    MalformedAction(String),
    /// The instruction table source does not have the expected shape.
    #[error("Instruction table parsing error: {0}")]
    TableParse(#[from] Box<pest::error::Error<Rule>>),
    /// A snapshot or tape encoding could not be restored.
    #[error("Snapshot parsing error: {0}")]
    SnapshotParse(String),
    /// A state name cannot be written to a snapshot.
    #[error("Invalid state name: {0}")]
    InvalidState(String),
    /// Reading a program file failed.
    #[error("File error: {0}")]
    FileError(String),
    /// No built-in program has the requested name.
    #[error("Unknown program: {0}")]
    UnknownProgram(String),
}
