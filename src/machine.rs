//! This module defines the `TuringMachine` struct, which owns a tape, the current state, a
//! step counter, and the instruction table it executes.
//!
//! There is no halt detection: the caller decides how many steps to run. By convention a
//! terminal state is one whose instruction is a no-op that loops back to itself.

use crate::encoder::{self, Snapshot};
use crate::palette::{Palette, STANDARD_PALETTE};
use crate::parser::parse_table;
use crate::tape::Tape;
use crate::types::{InstructionTable, TuringMachineError};

/// A single-tape Turing machine driven by an instruction table.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    state: String,
    step_count: usize,
    tape: Tape,
    table: InstructionTable,
    source: String,
    palette: Palette,
}

impl TuringMachine {
    /// Creates a machine in `initial_state` that runs the table described by `source`, using
    /// the standard palette.
    ///
    /// # Arguments
    ///
    /// * `initial_state` - The state the machine starts in.
    /// * `source` - The instruction table source text.
    /// * `tape` - The starting tape; a blank tape is used when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the table loads.
    /// * `Err(TuringMachineError::InvalidState)` if `initial_state` holds both quote characters.
    /// * `Err(TuringMachineError::TableParse)` or `Err(TuringMachineError::MalformedAction)`
    ///   if the table does not load.
    pub fn new(
        initial_state: impl Into<String>,
        source: &str,
        tape: Option<Tape>,
    ) -> Result<Self, TuringMachineError> {
        Self::with_palette(initial_state, source, tape, STANDARD_PALETTE.clone())
    }

    /// Creates a machine whose table resolves operation names through `palette`.
    pub fn with_palette(
        initial_state: impl Into<String>,
        source: &str,
        tape: Option<Tape>,
        palette: Palette,
    ) -> Result<Self, TuringMachineError> {
        let state: String = initial_state.into();
        if !encoder::is_encodable_state(&state) {
            return Err(TuringMachineError::InvalidState(state));
        }
        let table = parse_table(source, &palette)?;

        Ok(Self {
            state,
            step_count: 0,
            tape: tape.unwrap_or_default(),
            table,
            source: source.trim().to_string(),
            palette,
        })
    }

    /// Creates a machine from snapshot text, using the standard palette.
    ///
    /// Fields missing from the snapshot start out fresh: a blank tape and a step count of `0`.
    pub fn from_snapshot(encoded: &str) -> Result<Self, TuringMachineError> {
        let snapshot = encoder::decode(encoded)?;
        let mut machine = Self::new(snapshot.state, &snapshot.table, snapshot.tape)
            .map_err(embedded_table_error)?;
        machine.step_count = snapshot.steps.unwrap_or(0);

        Ok(machine)
    }

    /// Replaces the instruction table. On error the current table is kept.
    pub fn load_instruction_table(&mut self, source: &str) -> Result<(), TuringMachineError> {
        self.table = parse_table(source, &self.palette)?;
        self.source = source.trim().to_string();

        Ok(())
    }

    /// Executes a single step: read, look up, apply the actions, change state, count.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the step was taken.
    /// * `Err(TuringMachineError::UnknownState)` if the current state has no instruction.
    /// * `Err(TuringMachineError::MissingWildcard)` if no entry matches the symbol read.
    ///
    /// A failed step leaves the machine untouched.
    pub fn step(&mut self) -> Result<(), TuringMachineError> {
        let symbol = self.tape.read();
        let transition = self.table.transition(&self.state, symbol)?;

        for &action in &transition.actions {
            self.tape.apply(action);
        }

        self.state.clone_from(&transition.next_state);
        self.step_count += 1;

        Ok(())
    }

    /// Executes `steps` steps, stopping at the first error.
    pub fn run(&mut self, steps: usize) -> Result<(), TuringMachineError> {
        for _ in 0..steps {
            self.step()?;
        }

        Ok(())
    }

    /// Encodes the full state of the machine as snapshot text.
    pub fn encode(&self) -> String {
        encoder::encode(self)
    }

    /// Restores the machine from snapshot text.
    ///
    /// The embedded table is loaded through this machine's palette. Fields missing from the
    /// snapshot keep their current values. On error nothing changes.
    pub fn decode(&mut self, encoded: &str) -> Result<(), TuringMachineError> {
        let Snapshot {
            state,
            steps,
            tape,
            table,
        } = encoder::decode(encoded)?;
        let parsed = parse_table(&table, &self.palette).map_err(embedded_table_error)?;

        self.state = state;
        self.table = parsed;
        self.source = table;
        if let Some(steps) = steps {
            self.step_count = steps;
        }
        if let Some(tape) = tape {
            self.tape = tape;
        }

        Ok(())
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the loaded instruction table.
    pub fn table(&self) -> &InstructionTable {
        &self.table
    }

    /// Returns the instruction table source text the table was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Reports a table that fails to load from inside a snapshot as a snapshot error.
fn embedded_table_error(error: TuringMachineError) -> TuringMachineError {
    TuringMachineError::SnapshotParse(format!("Invalid instruction table: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    /// Turing's first example: prints 0 and 1 alternately on every other square.
    const TURING_FIRST: &str = r#"
{
  b: ([P0, R], c),
  c: (R, e),
  e: ([P1, R], f),
  f: (R, b),
}
"#;

    /// A single state that rewrites the square under the cursor.
    const REWRITE: &str = r#"
{
  b: {
    *:   (P0, b),
    '0': ([P1, R2], b),
    '1': ([P0, R2], b),
  },
}
"#;

    fn contents_after(source: &str, steps: usize) -> String {
        let mut machine = TuringMachine::new("b", source, None).unwrap();
        machine.run(steps).unwrap();
        machine.tape().contents_as_string()
    }

    #[test]
    fn test_machine_creation() {
        let machine = TuringMachine::new("b", REWRITE, None).unwrap();

        assert_eq!(machine.state(), "b");
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape(), &Tape::new());
        assert_eq!(machine.table().len(), 1);
        assert_eq!(machine.source(), REWRITE.trim());
    }

    #[test]
    fn test_turing_first_example() {
        assert_eq!(contents_after(TURING_FIRST, 1), "0");
        assert_eq!(contents_after(TURING_FIRST, 3), "01");
        assert_eq!(contents_after(TURING_FIRST, 5), "010");
        assert_eq!(contents_after(TURING_FIRST, 16), "01010101");
    }

    #[test]
    fn test_single_state_rewrite() {
        assert_eq!(contents_after(REWRITE, 1), "0");
        assert_eq!(contents_after(REWRITE, 3), "10");
        assert_eq!(contents_after(REWRITE, 5), "110");
    }

    #[test]
    fn test_unknown_state_leaves_machine_untouched() {
        let mut machine = TuringMachine::new("q", REWRITE, None).unwrap();

        let result = machine.step();

        assert_eq!(
            result,
            Err(TuringMachineError::UnknownState("q".to_string()))
        );
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.state(), "q");
        assert_eq!(machine.tape(), &Tape::new());
    }

    #[test]
    fn test_unknown_next_state_fails_on_following_step() {
        let mut machine = TuringMachine::new("b", "{ b: (P1, nowhere) }", None).unwrap();

        assert!(machine.step().is_ok());
        assert_eq!(machine.state(), "nowhere");
        assert!(matches!(
            machine.step(),
            Err(TuringMachineError::UnknownState(state)) if state == "nowhere"
        ));
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_missing_wildcard() {
        let mut machine = TuringMachine::new("b", "{ b: { '1': (P0, b) } }", None).unwrap();

        assert_eq!(
            machine.step(),
            Err(TuringMachineError::MissingWildcard {
                state: "b".to_string(),
                symbol: Symbol::Blank,
            })
        );
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_wildcard_only_applies_to_any_symbol() {
        let source = "{ b: { *: ([P7, R], b) } }";

        let mut tape = Tape::new();
        tape.print(Symbol::Mark('x'));
        tape.forward(1);
        tape.print(Symbol::Mark('3'));
        tape.backward(1);

        let mut machine = TuringMachine::new("b", source, Some(tape)).unwrap();
        machine.run(3).unwrap();

        assert_eq!(machine.tape().contents_as_string(), "777");
    }

    #[test]
    fn test_halt_convention() {
        let source = "{ b: { '1': (R, b), *: (P1, halt) }, halt: (NOP, halt) }";
        let tape = Tape::decode("(0, ['1', '1', .], [.])").unwrap();

        let mut machine = TuringMachine::new("b", source, Some(tape)).unwrap();
        machine.run(10).unwrap();

        assert_eq!(machine.state(), "halt");
        assert_eq!(machine.step_count(), 10);
        assert_eq!(machine.tape().contents_as_string(), "111");
    }

    #[test]
    fn test_run_stops_at_first_error() {
        let mut machine = TuringMachine::new("b", "{ b: (P1, c), c: (R, d) }", None).unwrap();

        let result = machine.run(5);

        assert!(matches!(result, Err(TuringMachineError::UnknownState(_))));
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.state(), "d");
    }

    #[test]
    fn test_new_rejects_malformed_tables() {
        assert!(matches!(
            TuringMachine::new("b", "{ b: (P0, b", None),
            Err(TuringMachineError::TableParse(_))
        ));
        assert!(matches!(
            TuringMachine::new("b", "{ b: (Jump, b) }", None),
            Err(TuringMachineError::MalformedAction(_))
        ));
    }

    #[test]
    fn test_extreme_step_counts() {
        assert!(matches!(
            TuringMachine::new("b", "{ b: ((L, -9223372036854775808), b) }", None),
            Err(TuringMachineError::MalformedAction(_))
        ));

        let mut machine =
            TuringMachine::new("b", "{ b: ((R, 9223372036854775807), b) }", None).unwrap();
        machine.run(3).unwrap();
        assert_eq!(machine.tape().cursor(), i64::MAX);

        let mut machine =
            TuringMachine::new("b", "{ b: ((L, 9223372036854775807), b) }", None).unwrap();
        machine.run(3).unwrap();
        assert_eq!(machine.tape().cursor(), i64::MIN);
        assert_eq!(machine.step_count(), 3);
    }

    #[test]
    fn test_quoted_states_round_trip() {
        for state in ["it's", "say \"hi\"", "two words", "#1"] {
            let source = "{ b: (P0, b) }";
            let machine = TuringMachine::new(state, source, None).unwrap();
            let restored = TuringMachine::from_snapshot(&machine.encode()).unwrap();
            assert_eq!(restored.state(), state);
        }

        assert_eq!(
            TuringMachine::new("a'\"b", "{ b: (P0, b) }", None).unwrap_err(),
            TuringMachineError::InvalidState("a'\"b".to_string())
        );
    }

    #[test]
    fn test_load_instruction_table_is_all_or_nothing() {
        let mut machine = TuringMachine::new("b", REWRITE, None).unwrap();

        assert!(machine.load_instruction_table("{ b: (P9, b) ").is_err());
        assert_eq!(machine.source(), REWRITE.trim());
        machine.step().unwrap();
        assert_eq!(machine.tape().read(), Symbol::Mark('0'));

        machine.load_instruction_table("{ b: (P9, b) }").unwrap();
        assert_eq!(machine.source(), "{ b: (P9, b) }");
        machine.step().unwrap();
        assert_eq!(machine.tape().read(), Symbol::Mark('9'));
    }

    #[test]
    fn test_empty_table_has_no_states() {
        let mut machine = TuringMachine::new("b", "", None).unwrap();

        assert!(machine.table().is_empty());
        assert!(matches!(
            machine.step(),
            Err(TuringMachineError::UnknownState(_))
        ));
    }

    #[test]
    fn test_encode_decode_resumes_identically() {
        let mut original = TuringMachine::new("b", TURING_FIRST, None).unwrap();
        original.run(7).unwrap();

        let mut restored = TuringMachine::new("unused", "", None).unwrap();
        restored.decode(&original.encode()).unwrap();

        assert_eq!(restored.state(), original.state());
        assert_eq!(restored.step_count(), 7);
        assert_eq!(restored.source(), original.source());
        assert_eq!(restored.tape(), original.tape());

        original.run(9).unwrap();
        restored.run(9).unwrap();
        assert_eq!(restored.state(), original.state());
        assert_eq!(restored.step_count(), original.step_count());
        assert_eq!(
            restored.tape().contents_as_string(),
            original.tape().contents_as_string()
        );
    }

    #[test]
    fn test_from_snapshot_with_defaults() {
        let machine = TuringMachine::from_snapshot("state: b\ntable: { b: (P0, b) }").unwrap();

        assert_eq!(machine.state(), "b");
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.tape(), &Tape::new());
    }

    #[test]
    fn test_decode_keeps_fields_absent_from_snapshot() {
        let mut machine = TuringMachine::new("b", REWRITE, None).unwrap();
        machine.run(2).unwrap();
        let tape = machine.tape().clone();

        machine.decode("state: c\ntable: { c: (P5, c) }").unwrap();

        assert_eq!(machine.state(), "c");
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.tape(), &tape);
        assert_eq!(machine.source(), "{ c: (P5, c) }");
    }

    #[test]
    fn test_decode_failure_leaves_machine_untouched() {
        let mut machine = TuringMachine::new("b", REWRITE, None).unwrap();
        machine.run(3).unwrap();
        let before = machine.encode();

        let bad_table = "state: b\nsteps: 99\ntable: { b: (P0 b) }";
        assert!(matches!(
            machine.decode(bad_table),
            Err(TuringMachineError::SnapshotParse(msg)) if msg.contains("Invalid instruction table")
        ));
        assert!(matches!(
            machine.decode("steps: 1"),
            Err(TuringMachineError::SnapshotParse(_))
        ));

        assert_eq!(machine.encode(), before);
    }

    #[test]
    fn test_decode_uses_machine_palette() {
        let mut palette = Palette::new();
        palette.register("mark", crate::palette::Operation::Bound(crate::Action::Write('#')));
        let mut machine = TuringMachine::with_palette("b", "{ b: (mark, b) }", None, palette).unwrap();

        machine.step().unwrap();
        let encoded = machine.encode();
        machine.decode(&encoded).unwrap();
        machine.step().unwrap();

        assert_eq!(machine.tape().contents_as_string(), "#");
        assert!(TuringMachine::from_snapshot(&encoded).is_err());
    }
}
