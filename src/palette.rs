//! This module provides the `Palette`, the table of operation names an instruction table may
//! refer to, and the rules for binding those operations to their parameters.

use crate::types::Action;
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// The palette used when no other is supplied.
    pub static ref STANDARD_PALETTE: Palette = Palette::standard();
}

/// A named tape operation, possibly awaiting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Print the single character given as the only argument.
    Print,
    /// Blank the square under the cursor. Takes no arguments.
    Erase,
    /// Move right by the optional integer argument (default `1`).
    Forward,
    /// Move left by the optional integer argument (default `1`).
    Backward,
    /// Do nothing. Takes no arguments.
    NoOp,
    /// An operation with its parameters already bound, such as `P0` or `R3`.
    Bound(Action),
}

/// A literal argument given to an operation in `(name, argument, ...)` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Number(i64),
    Text(String),
}

impl Operation {
    /// Binds `args` to this operation, producing the action to apply.
    pub fn bind(self, args: &[Argument]) -> Result<Action, String> {
        match (self, args) {
            (Operation::Bound(action), []) => Ok(action),
            (Operation::NoOp, []) => Ok(Action::NoOp),
            (Operation::Erase, []) => Ok(Action::Erase),
            (Operation::Forward, []) => Ok(Action::MoveForward(1)),
            (Operation::Forward, [Argument::Number(steps)]) => {
                step_count(*steps).map(Action::MoveForward)
            }
            (Operation::Backward, []) => Ok(Action::MoveBackward(1)),
            (Operation::Backward, [Argument::Number(steps)]) => {
                step_count(*steps).map(Action::MoveBackward)
            }
            (Operation::Print, [Argument::Text(text)]) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Action::Write(c)),
                    _ => Err(format!("expected a single character to print, found {text:?}")),
                }
            }
            (Operation::Print, []) => Err("missing the symbol to print".to_string()),
            (operation, args) => Err(format!(
                "{operation:?} does not accept arguments ({})",
                args.iter()
                    .map(|arg| match arg {
                        Argument::Number(n) => n.to_string(),
                        Argument::Text(text) => format!("{text:?}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Accepts a step count only if its negation is representable, so a move can always be
/// reversed.
fn step_count(steps: i64) -> Result<i64, String> {
    if steps == i64::MIN {
        Err(format!("step count {steps} is out of range"))
    } else {
        Ok(steps)
    }
}

/// Maps operation names to operations. Passed explicitly to the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    operations: HashMap<String, Operation>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard palette.
    ///
    /// * `P`/`Print`, `E`/`Erase`, `R`/`Forward`, `L`/`Backward`, `NOP`
    /// * `P0`..`P9`, `Px`, `Py`, `Pz` print that symbol
    /// * `R2`..`R9` and `L2`..`L9` move that many squares
    pub fn standard() -> Self {
        let mut palette = Self::new();

        for (names, operation) in [
            (["P", "Print"], Operation::Print),
            (["E", "Erase"], Operation::Erase),
            (["R", "Forward"], Operation::Forward),
            (["L", "Backward"], Operation::Backward),
        ] {
            for name in names {
                palette.register(name, operation);
            }
        }
        palette.register("NOP", Operation::NoOp);

        for c in ('0'..='9').chain(['x', 'y', 'z']) {
            palette.register(format!("P{c}"), Operation::Bound(Action::Write(c)));
        }
        for steps in 2..=9 {
            palette.register(format!("R{steps}"), Operation::Bound(Action::MoveForward(steps)));
            palette.register(format!("L{steps}"), Operation::Bound(Action::MoveBackward(steps)));
        }

        palette
    }

    /// Registers `operation` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, operation: Operation) -> &mut Self {
        self.operations.insert(name.into(), operation);
        self
    }

    /// Looks up an operation by name.
    pub fn get(&self, name: &str) -> Option<Operation> {
        self.operations.get(name).copied()
    }

    /// Resolves `name` applied to `args` into an action.
    pub fn resolve(&self, name: &str, args: &[Argument]) -> Result<Action, String> {
        self.get(name)
            .ok_or_else(|| format!("unknown operation `{name}`"))?
            .bind(args)
    }
}
