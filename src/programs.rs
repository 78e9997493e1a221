//! Built-in programs shipped with the crate, embedded from the `programs/` directory.

use crate::loader::ProgramLoader;
use crate::machine::TuringMachine;
use crate::types::TuringMachineError;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("turing-first", include_str!("../programs/turing-first.tm")),
    ("unary-successor", include_str!("../programs/unary-successor.tm")),
    ("binary-increment", include_str!("../programs/binary-increment.tm")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = PROGRAM_TEXTS
        .iter()
        .map(|&(name, text)| ProgramInfo::new(name, text))
        .collect();
}

/// A built-in program and its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub name: &'static str,
    /// The first comment line of the program file.
    pub description: String,
    /// The program text, comments included.
    pub text: &'static str,
}

impl ProgramInfo {
    fn new(name: &'static str, text: &'static str) -> Self {
        let description = text
            .lines()
            .next()
            .and_then(|line| line.strip_prefix('#'))
            .map(|line| line.trim().to_string())
            .unwrap_or_default();

        Self {
            name,
            description,
            text,
        }
    }
}

/// Looks up the built-in programs by name.
pub struct ProgramManager;

impl ProgramManager {
    /// Returns the names of all built-in programs, in the order they are shipped.
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name).collect()
    }

    /// Returns the program named `name`, or `TuringMachineError::UnknownProgram` if there is
    /// no such program.
    pub fn get_program_info(name: &str) -> Result<&'static ProgramInfo, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| TuringMachineError::UnknownProgram(name.to_string()))
    }

    /// Returns a fresh machine loaded from the program named `name`.
    pub fn get_program_by_name(name: &str) -> Result<TuringMachine, TuringMachineError> {
        ProgramLoader::load_program_from_string(Self::get_program_info(name)?.text)
    }
}
