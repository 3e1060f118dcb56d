//! The sorting pipeline: ingest, encode, solve or write, decode, check

use super::{SortValidator, ValidationResult};
use crate::config::Settings;
use crate::error::SortError;
use crate::lines::{self, PaddedLines};
use crate::sat::encoder::{ComplexityEstimate, EncodingStatistics};
use crate::sat::{read_model, SatEncoder};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

/// A set of lines to be sorted through a SAT encoding
pub struct SortProblem {
    settings: Settings,
    encoder: SatEncoder,
}

/// Sorted lines together with how they were obtained
#[derive(Debug)]
pub struct SortOutcome {
    pub lines: Vec<Vec<u8>>,
    pub statistics: Option<EncodingStatistics>,
    pub validation: Option<ValidationResult>,
}

impl SortProblem {
    /// Create a problem over lines already in memory
    pub fn new(settings: Settings, lines: Vec<Vec<u8>>) -> Result<Self> {
        settings.validate().context("Configuration validation failed")?;
        lines::check_lines(&lines, &settings.limits)?;

        let padded = PaddedLines::new(lines);
        info!(lines = padded.len(), width = padded.width(), "input normalized");

        let encoder = SatEncoder::new(settings.clone(), padded);
        Ok(Self { settings, encoder })
    }

    /// Create a problem from a file, or standard input when `path` is `None`
    pub fn from_input(settings: Settings, path: Option<&Path>) -> Result<Self> {
        let lines = lines::load_lines(path, &settings.limits)?;
        Self::new(settings, lines)
    }

    /// The input lines, in their original order
    pub fn input(&self) -> &[Vec<u8>] {
        self.encoder.lines().lines()
    }

    /// Encode, solve with the live engine and decode
    pub fn sort(&self) -> Result<SortOutcome> {
        let solution = self.encoder.solve().context("SAT solving failed")?;
        let validation = self.check(&solution.lines)?;

        Ok(SortOutcome {
            lines: solution.lines,
            statistics: Some(solution.statistics),
            validation,
        })
    }

    /// Write the clause artifact instead of solving
    pub fn write_artifact<W: Write>(&self, out: W) -> Result<EncodingStatistics> {
        let statistics = self
            .encoder
            .write_dimacs(out)
            .context("Failed to write DIMACS artifact")?;
        info!(
            variables = statistics.constraints.variables.total_variables,
            clauses = statistics.constraints.total_clauses,
            "artifact written"
        );
        Ok(statistics)
    }

    /// Decode a result file produced by an external solver for this input's artifact
    pub fn decode<R: BufRead>(&self, model: R) -> Result<SortOutcome> {
        let solution = read_model(model).context("Failed to read solver result")?;
        let lines = self.encoder.decode_model(&solution)?;
        let validation = self.check(&lines)?;

        Ok(SortOutcome {
            lines,
            statistics: None,
            validation,
        })
    }

    /// Get encoding statistics without solving
    pub fn encoding_statistics(&self) -> Result<EncodingStatistics> {
        self.encoder
            .statistics()
            .context("Failed to generate the formula")
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder.estimate_complexity()
    }

    fn check(&self, output: &[Vec<u8>]) -> Result<Option<ValidationResult>> {
        if !self.settings.output.validate {
            return Ok(None);
        }

        let validation = SortValidator::validate(self.input(), output);
        if let Some(reason) = &validation.error_message {
            return Err(SortError::InvariantViolation {
                reason: reason.clone(),
            }
            .into());
        }
        Ok(Some(validation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{SatSolver, SolverSolution};

    fn problem(items: &[&str]) -> SortProblem {
        let lines = items.iter().map(|item| item.as_bytes().to_vec()).collect();
        SortProblem::new(Settings::default(), lines).unwrap()
    }

    #[test]
    fn test_sort_validates() {
        let outcome = problem(&["cherry", "apple", "banana"]).sort().unwrap();
        assert_eq!(outcome.lines[0], b"apple");
        assert!(outcome.validation.unwrap().is_valid);
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let mut settings = Settings::default();
        settings.output.validate = false;
        let problem = SortProblem::new(settings, vec![b"b".to_vec(), b"a".to_vec()]).unwrap();
        assert!(problem.sort().unwrap().validation.is_none());
    }

    #[test]
    fn test_limits_enforced_for_in_memory_lines() {
        let mut settings = Settings::default();
        settings.limits.max_lines = 1;
        let err = SortProblem::new(settings, vec![b"b".to_vec(), b"a".to_vec()])
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<SortError>(),
            Some(SortError::TooManyLines { limit: 1 })
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let problem = problem(&["delta", "alpha", "charlie", "bravo"]);

        let mut artifact = Vec::new();
        problem.write_artifact(&mut artifact).unwrap();

        // solve the artifact as an external tool would and hand back its model
        let text = String::from_utf8(artifact).unwrap();
        let mut solver = SatSolver::new();
        for line in text.lines().skip(1) {
            let literals: Vec<i32> = line
                .split_whitespace()
                .map(|token| token.parse().unwrap())
                .take_while(|&literal| literal != 0)
                .collect();
            crate::sat::ClauseSink::add_clause(&mut solver, &literals).unwrap();
        }
        let solution: SolverSolution = solver.solve().unwrap();
        let mut model = String::from("s SATISFIABLE\nv");
        for (var, value) in &solution.assignment {
            model.push_str(&format!(" {}", if *value { *var } else { -var }));
        }
        model.push_str(" 0\n");

        let outcome = problem.decode(model.as_bytes()).unwrap();
        assert_eq!(
            outcome.lines,
            vec![b"alpha".to_vec(), b"bravo".to_vec(), b"charlie".to_vec(), b"delta".to_vec()]
        );
    }

    #[test]
    fn test_bogus_model_is_an_invariant_violation() {
        let problem = problem(&["b", "a"]);
        // every variable false decodes to two empty lines
        let err = problem.decode("s SATISFIABLE\nv 0\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SortError>(),
            Some(SortError::InvariantViolation { .. })
        ));
    }
}
