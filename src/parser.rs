//! This module provides the parser for instruction tables, tape encodings, and machine
//! snapshots, utilizing the `pest` crate. The grammar lives in `grammar.pest`.
//!
//! Operation names in a table are resolved through a [`Palette`] supplied by the caller, so
//! the parser itself knows nothing about which operations exist.

use crate::{
    encoder::Snapshot,
    palette::{Argument, Palette},
    tape::{Cell, Tape},
    types::{Action, Branches, Instruction, InstructionTable, Symbol, Transition, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashMap;

/// Derives a `PestParser` for the grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TuringMachineParser;

/// Parses an instruction table, resolving every action through `palette`.
///
/// An empty (or whitespace-only) source yields an empty table.
///
/// # Returns
///
/// * `Ok(InstructionTable)` if the source is well formed.
/// * `Err(TuringMachineError::TableParse)` for syntax errors, duplicate states or symbol
///   keys, and symbol keys that are not a single character.
/// * `Err(TuringMachineError::MalformedAction)` for unknown operations or operations given
///   arguments they do not accept.
pub fn parse_table(input: &str, palette: &Palette) -> Result<InstructionTable, TuringMachineError> {
    let root = TuringMachineParser::parse(Rule::table, input.trim())
        .map_err(|e| TuringMachineError::TableParse(e.into()))?
        .next()
        .unwrap();

    match root.into_inner().find(|p| p.as_rule() == Rule::mapping) {
        Some(mapping) => parse_mapping(mapping, palette),
        None => Ok(InstructionTable::default()),
    }
}

/// Parses a tape encoding of the form `(cursor, [right squares], [left squares])`.
pub fn parse_tape(input: &str) -> Result<Tape, TuringMachineError> {
    let root = TuringMachineParser::parse(Rule::tape, input.trim())
        .map_err(|e| snapshot_error(&e))?
        .next()
        .unwrap();

    parse_tape_body(root.into_inner().next().unwrap())
}

/// Parses a snapshot into its fields. The embedded table source is returned verbatim and is
/// not parsed here.
pub fn parse_snapshot(input: &str) -> Result<Snapshot, TuringMachineError> {
    let root = TuringMachineParser::parse(Rule::snapshot, input.trim())
        .map_err(|e| snapshot_error(&e))?
        .next()
        .unwrap();

    let mut snapshot = Snapshot::default();

    for field in root.into_inner() {
        match field.as_rule() {
            Rule::state_field => snapshot.state = parse_state(field.into_inner().next().unwrap()),
            Rule::steps_field => {
                let count = field.into_inner().next().unwrap();
                snapshot.steps = Some(count.as_str().parse().map_err(|_| {
                    TuringMachineError::SnapshotParse(format!(
                        "Step count out of range: {}",
                        count.as_str()
                    ))
                })?);
            }
            Rule::tape_field => {
                snapshot.tape = Some(parse_tape_body(field.into_inner().next().unwrap())?);
            }
            Rule::table_field => {
                snapshot.table = field.into_inner().next().unwrap().as_str().trim().to_string();
            }
            _ => {} // EOI
        }
    }

    Ok(snapshot)
}

/// Parses the top-level `{ state: instruction, ... }` mapping.
fn parse_mapping(pair: Pair<Rule>, palette: &Palette) -> Result<InstructionTable, TuringMachineError> {
    let mut instructions = HashMap::new();

    for entry in pair.into_inner() {
        let span = entry.as_span();
        let mut pairs = entry.into_inner();
        let state = parse_state(pairs.next().unwrap());
        let instruction = parse_instruction(pairs.next().unwrap(), palette)?;

        // Prevent duplicated states
        if instructions.contains_key(&state) {
            return Err(parse_error(&format!("Duplicate state: {state}"), span));
        }

        instructions.insert(state, instruction);
    }

    Ok(InstructionTable::new(instructions))
}

/// Parses either symbol-keyed branches or an unconditional transition.
fn parse_instruction(pair: Pair<Rule>, palette: &Palette) -> Result<Instruction, TuringMachineError> {
    let inner = pair.into_inner().next().unwrap();

    match inner.as_rule() {
        Rule::branches => parse_branches(inner, palette).map(Instruction::OnSymbol),
        _ => parse_transition(inner, palette).map(Instruction::Always),
    }
}

/// Parses `{ key: transition, ... }` where a key is a quoted character or the `*` wildcard.
fn parse_branches(pair: Pair<Rule>, palette: &Palette) -> Result<Branches, TuringMachineError> {
    let mut branches = Branches::default();

    for branch in pair.into_inner() {
        let mut pairs = branch.into_inner();
        let key = pairs.next().unwrap().into_inner().next().unwrap();
        let span = key.as_span();
        let transition = parse_transition(pairs.next().unwrap(), palette)?;

        match key.as_rule() {
            Rule::wildcard => {
                if branches.wildcard.replace(transition).is_some() {
                    return Err(parse_error("Duplicate wildcard entry", span));
                }
            }
            _ => {
                let c = parse_char(key).ok_or_else(|| {
                    parse_error("Symbol keys must be a single character", span)
                })?;

                if branches.symbols.insert(c, transition).is_some() {
                    return Err(parse_error(&format!("Duplicate symbol key: '{c}'"), span));
                }
            }
        }
    }

    Ok(branches)
}

/// Parses `(actions, next_state)`.
fn parse_transition(pair: Pair<Rule>, palette: &Palette) -> Result<Transition, TuringMachineError> {
    let mut pairs = pair.into_inner();
    let actions = pairs
        .next()
        .unwrap()
        .into_inner()
        .map(|action| parse_action(action, palette))
        .collect::<Result<Vec<_>, _>>()?;
    let next_state = parse_state(pairs.next().unwrap());

    Ok(Transition {
        actions,
        next_state,
    })
}

/// Parses a bare operation name or an `(operation, argument, ...)` call.
fn parse_action(pair: Pair<Rule>, palette: &Palette) -> Result<Action, TuringMachineError> {
    let text = pair.as_str();
    let inner = pair.into_inner().next().unwrap();

    let (name, args) = match inner.as_rule() {
        Rule::call => {
            let mut pairs = inner.into_inner();
            let name = pairs.next().unwrap().as_str();
            let args = parse_arguments(pairs)
                .map_err(|e| TuringMachineError::MalformedAction(format!("{text}: {e}")))?;
            (name, args)
        }
        _ => (inner.as_str(), Vec::new()),
    };

    palette
        .resolve(name, &args)
        .map_err(|e| TuringMachineError::MalformedAction(format!("{text}: {e}")))
}

/// Parses the literal arguments of a call.
fn parse_arguments(pairs: Pairs<Rule>) -> Result<Vec<Argument>, String> {
    pairs
        .map(|argument| {
            let literal = argument.into_inner().next().unwrap();
            match literal.as_rule() {
                Rule::number => literal
                    .as_str()
                    .parse()
                    .map(Argument::Number)
                    .map_err(|_| format!("number out of range: {}", literal.as_str())),
                _ => Ok(Argument::Text(parse_quoted(literal))),
            }
        })
        .collect()
}

/// Parses `(cursor, [cells], [cells])`.
fn parse_tape_body(pair: Pair<Rule>) -> Result<Tape, TuringMachineError> {
    let mut pairs = pair.into_inner();
    let cursor = pairs.next().unwrap();
    let cursor = cursor.as_str().parse::<i64>().map_err(|_| {
        TuringMachineError::SnapshotParse(format!("Cursor out of range: {}", cursor.as_str()))
    })?;
    let right = parse_cells(pairs.next().unwrap())?;
    let left = parse_cells(pairs.next().unwrap())?;

    Ok(Tape::from_parts(cursor, right, left))
}

/// Parses a list of encoded squares.
fn parse_cells(pair: Pair<Rule>) -> Result<Vec<Cell>, TuringMachineError> {
    pair.into_inner()
        .map(|cell| {
            let inner = cell.into_inner().next().unwrap();
            match inner.as_rule() {
                Rule::unwritten_cell => Ok(None),
                Rule::erased_cell => Ok(Some(Symbol::Blank)),
                _ => {
                    let text = inner.as_str().to_string();
                    parse_char(inner).map(|c| Some(Symbol::Mark(c))).ok_or_else(|| {
                        TuringMachineError::SnapshotParse(format!(
                            "Tape squares must hold a single character, found {text}"
                        ))
                    })
                }
            }
        })
        .collect()
}

/// Parses a state name, which is either an identifier or a quoted string.
fn parse_state(pair: Pair<Rule>) -> String {
    let inner = pair.into_inner().next().unwrap();

    match inner.as_rule() {
        Rule::quoted => parse_quoted(inner),
        _ => inner.as_str().to_string(),
    }
}

/// Extracts the text between the quotes of a `quoted` pair.
fn parse_quoted(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().to_string()
}

/// Extracts a quoted single character, or `None` if the quotes hold anything else.
fn parse_char(pair: Pair<Rule>) -> Option<char> {
    let text = parse_quoted(pair);
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Creates a `TuringMachineError::TableParse` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::TableParse(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Converts a grammar error on a tape or snapshot into a `TuringMachineError::SnapshotParse`.
fn snapshot_error(error: &Error<Rule>) -> TuringMachineError {
    TuringMachineError::SnapshotParse(error.to_string())
}
