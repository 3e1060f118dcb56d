//! Sorting lines with a SAT solver
//!
//! The lines are encoded as a propositional formula whose satisfying
//! assignments are exactly the sorted arrangements of the input: a permutation
//! matrix maps input lines to output positions, channeling clauses copy the
//! bits across, and a tie-propagation chain orders adjacent output rows.
//! The formula is either handed to CaDiCaL directly or written out in DIMACS.

pub mod config;
pub mod error;
pub mod lines;
pub mod sat;
pub mod sorting;
pub mod utils;

pub use config::Settings;
pub use error::{Result, SortError};
pub use sorting::{SortOutcome, SortProblem};

/// Sort `lines` with the live solver, using the given settings
pub fn sort_lines(settings: Settings, lines: Vec<Vec<u8>>) -> anyhow::Result<Vec<Vec<u8>>> {
    let problem = SortProblem::new(settings, lines)?;
    Ok(problem.sort()?.lines)
}
