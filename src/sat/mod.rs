//! SAT encoding of the sorting problem

pub mod variables;
pub mod constraints;
pub mod sink;
pub mod encoder;
pub mod solver;
pub mod decoder;

pub use variables::{Literal, Variable, VariableManager, VariableTables};
pub use constraints::{at_most_one, Clause, ConstraintGenerator};
pub use sink::{ClauseBuffer, ClauseCounter, ClauseSink, DimacsWriter};
pub use encoder::{EncodedSolution, EncodingStatistics, SatEncoder};
pub use solver::{SatSolver, SolverSolution};
pub use decoder::{read_model, SolutionDecoder};
