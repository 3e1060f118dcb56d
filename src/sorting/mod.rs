//! Sorting problem definition and result validation

pub mod problem;
pub mod validator;

pub use problem::{SortOutcome, SortProblem};
pub use validator::{SortValidator, ValidationResult};
