//! This crate provides the core logic for a single-tape Turing machine interpreter.
//! It includes the unbounded tape, the instruction table parser, the step engine,
//! and a snapshot format for pausing and resuming runs.

pub mod encoder;
pub mod loader;
pub mod machine;
pub mod palette;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the snapshot type and encoding functions from the encoder module.
pub use encoder::{decode, encode, Snapshot};
/// Re-exports the `ProgramLoader` struct and comment stripping from the loader module.
pub use loader::{strip_comments, ProgramLoader};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the operation palette.
pub use palette::{Argument, Operation, Palette, STANDARD_PALETTE};
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse_snapshot, parse_table, parse_tape};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::{Cell, Tape};
/// Re-exports the data model and error type from the types module.
pub use types::{
    Action, Branches, Instruction, InstructionTable, Symbol, Transition, TuringMachineError,
};
