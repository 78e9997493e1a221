//! This module provides the `ProgramLoader` struct, responsible for turning program files and
//! strings into machines. Program text is snapshot text that may carry `#` comments.

use crate::machine::TuringMachine;
use crate::types::TuringMachineError;
use std::fs;
use std::path::Path;

/// The marker that starts a comment running to the end of the line.
pub const COMMENT_MARKER: char = '#';

/// `ProgramLoader` is a utility struct for loading machines from files and strings.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a machine from the program file at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the program file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is read and its snapshot restored.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::SnapshotParse)` if the content is not a valid snapshot.
    pub fn load_program(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a machine from program text, stripping comments first.
    pub fn load_program_from_string(content: &str) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::from_snapshot(&strip_comments(content))
    }
}

/// Removes everything from a `#` to the end of its line, keeping the line breaks.
///
/// A `#` between quotes is part of a symbol or state name and is kept. Quotes may span
/// lines, since a printed newline is saved as a quoted literal.
pub fn strip_comments(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut quote = None;
    let mut in_comment = false;

    for c in text.chars() {
        match (in_comment, quote, c) {
            (true, _, '\n') => {
                in_comment = false;
                stripped.push(c);
            }
            (true, _, _) => {}
            (false, None, COMMENT_MARKER) => in_comment = true,
            (false, None, '\'' | '"') => {
                quote = Some(c);
                stripped.push(c);
            }
            (false, Some(open), _) => {
                if open == c {
                    quote = None;
                }
                stripped.push(c);
            }
            (false, None, _) => stripped.push(c),
        }
    }

    stripped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::Tape;
    use crate::types::Symbol;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const PROGRAM: &str = r#"# Writes 0 forever in one square.
state: b   # the initial state
table:
{
  b: (P0, b),   # no movement
}
"#;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a # b\nc\n# d\ne#"), "a \nc\n\ne");
        assert_eq!(strip_comments("no comments"), "no comments");
        assert_eq!(strip_comments(""), "");
        assert_eq!(
            strip_comments("'#': (P, '#') # print a hash\n\"#\" # quoted"),
            "'#': (P, '#') \n\"#\" "
        );
    }

    #[test]
    fn test_quotes_span_lines() {
        assert_eq!(strip_comments("'\n', '#' # mark\n"), "'\n', '#' \n");
        assert_eq!(strip_comments("# it's\n'#'"), "\n'#'");
    }

    #[test]
    fn test_reload_tape_with_newline_mark() {
        let mut tape = Tape::new();
        tape.print(Symbol::Mark('\n'));
        tape.forward(1);
        tape.print(Symbol::Mark('#'));

        let machine = TuringMachine::new("b", "{ b: (NOP, b) }", Some(tape.clone())).unwrap();
        let reloaded = ProgramLoader::load_program_from_string(&machine.encode()).unwrap();

        assert_eq!(reloaded.tape(), &tape);
        assert_eq!(reloaded.tape().contents_as_string(), "\n#");
    }

    #[test]
    fn test_load_program_from_string() {
        let mut machine = ProgramLoader::load_program_from_string(PROGRAM).unwrap();

        assert_eq!(machine.state(), "b");
        assert!(!machine.source().contains('#'));
        machine.run(3).unwrap();
        assert_eq!(machine.tape().contents_as_string(), "0");
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("zeros.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(PROGRAM.as_bytes()).unwrap();

        let machine = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(machine.state(), "b");
        assert_eq!(machine.table().len(), 1);
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid program").unwrap();

        let result = ProgramLoader::load_program(&file_path);
        assert!(matches!(result, Err(TuringMachineError::SnapshotParse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let result = ProgramLoader::load_program(&dir.path().join("missing.tm"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }
}
