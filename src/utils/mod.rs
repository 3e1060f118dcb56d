//! Terminal output helpers

pub mod display;

pub use display::{ColorOutput, StatisticsFormatter, Tone};
