//! This module provides the snapshot format that captures a machine's full state as text so
//! that a run can be paused and resumed.
//!
//! ```text
//! state: b
//! steps: 3
//! tape: (2, ['1', ., '0', .], [.])
//! table: { b: { *: (P0, b), '0': ([P1, R2], b), '1': ([P0, R2], b) } }
//! ```
//!
//! `steps` and `tape` are optional, so a hand-written program is just `state` plus `table`.
//! The table source always comes last and is kept verbatim.

use crate::machine::TuringMachine;
use crate::parser::{parse_snapshot, TuringMachineParser};
use crate::tape::Tape;
use crate::types::TuringMachineError;
use crate::Rule;
use pest::Parser as PestParser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fields of a snapshot, as read from or written to text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The state the machine is in.
    pub state: String,
    /// The number of steps executed so far.
    pub steps: Option<usize>,
    /// The tape, if the snapshot carries one.
    pub tape: Option<Tape>,
    /// The instruction table source text.
    pub table: String,
}

/// Encodes the full state of `machine`.
pub fn encode(machine: &TuringMachine) -> String {
    Snapshot {
        state: machine.state().to_string(),
        steps: Some(machine.step_count()),
        tape: Some(machine.tape().clone()),
        table: machine.source().to_string(),
    }
    .to_string()
}

/// Decodes snapshot text into its fields without loading the instruction table.
pub fn decode(encoded: &str) -> Result<Snapshot, TuringMachineError> {
    parse_snapshot(encoded)
}

/// Returns `true` if `state` can be written to a snapshot. A quoted name cannot hold both
/// quote characters.
pub fn is_encodable_state(state: &str) -> bool {
    !(state.contains('\'') && state.contains('"'))
}

/// Writes a state name bare when it is an identifier and quoted otherwise.
fn encode_state(state: &str) -> String {
    let is_ident = TuringMachineParser::parse(Rule::ident, state)
        .map(|mut pairs| pairs.next().is_some_and(|p| p.as_str() == state))
        .unwrap_or(false);

    if is_ident {
        state.to_string()
    } else if state.contains('\'') {
        format!("\"{state}\"")
    } else {
        format!("'{state}'")
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state: {}", encode_state(&self.state))?;
        if let Some(steps) = self.steps {
            writeln!(f, "steps: {steps}")?;
        }
        if let Some(tape) = &self.tape {
            writeln!(f, "tape: {tape}")?;
        }
        write!(f, "table: {}", self.table)
    }
}

impl FromStr for Snapshot {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
