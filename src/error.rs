//! Error kinds for the encoding pipeline
//!
//! Every variant is fatal. Callers report it and stop; nothing here is meant
//! to be retried or recovered from.

use std::fmt;
use thiserror::Error;

/// Outcome of a solver call that did not produce a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolveOutcome::Satisfiable => "SATISFIABLE",
            SolveOutcome::Unsatisfiable => "UNSATISFIABLE",
            SolveOutcome::Unknown => "UNKNOWN",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("line {line}: input ends after {pending} byte(s) without a line terminator")]
    IncompleteLine { line: usize, pending: usize },

    #[error("line {line}: carriage return not followed by a line feed")]
    StrayCarriageReturn { line: usize },

    #[error("line {line}: embedded line feed")]
    EmbeddedNewline { line: usize },

    #[error("line {line}: embedded NUL byte at offset {offset}")]
    NulByte { line: usize, offset: usize },

    #[error("input has more than {limit} lines")]
    TooManyLines { limit: usize },

    #[error("line {line} is {length} bytes long, exceeding the limit of {limit}")]
    LineTooLong {
        line: usize,
        length: usize,
        limit: usize,
    },

    #[error("variable limit exceeded: cannot allocate more than {limit} variables")]
    VariableOverflow { limit: usize },

    #[error("failed to allocate {entries} entries for the {table} table")]
    AllocationFailed { table: &'static str, entries: usize },

    #[error("solver reported {outcome} for a formula that is satisfiable by construction")]
    NotSatisfiable { outcome: SolveOutcome },

    #[error("decoded output violates the sorting invariant: {reason}")]
    InvariantViolation { reason: String },

    #[error("model line {line}: {reason}")]
    MalformedModel { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SortError>;
