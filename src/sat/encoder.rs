//! SAT encoder for sorting lines

use super::constraints::{ConstraintGenerator, ConstraintStatistics};
use super::decoder::SolutionDecoder;
use super::sink::{ClauseCounter, ClauseSink, DimacsWriter};
use super::solver::{SatSolver, SolverSolution, SolverStatistics};
use super::variables::{VariableManager, VariableTables, MAX_VARIABLES};
use crate::config::Settings;
use crate::error::{Result, SortError};
use crate::lines::PaddedLines;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Tables and counts produced by one generation pass
pub struct Encoding {
    pub tables: VariableTables,
    pub statistics: ConstraintStatistics,
}

/// Lines decoded from a model, with the statistics of the run
pub struct EncodedSolution {
    pub lines: Vec<Vec<u8>>,
    pub statistics: EncodingStatistics,
}

/// Main SAT encoder for a set of lines
pub struct SatEncoder {
    settings: Settings,
    lines: PaddedLines,
}

impl SatEncoder {
    /// Create a new SAT encoder over the given lines
    pub fn new(settings: Settings, lines: PaddedLines) -> Self {
        Self { settings, lines }
    }

    pub fn lines(&self) -> &PaddedLines {
        &self.lines
    }

    /// Generate the whole formula into `sink`
    pub fn encode<S: ClauseSink + ?Sized>(&self, sink: &mut S) -> Result<Encoding> {
        self.check_capacity()?;

        let mut generator = ConstraintGenerator::new(&self.lines)?;
        generator.generate_all_constraints(sink)?;

        let statistics = generator.statistics();
        info!(
            variables = statistics.variables.total_variables,
            clauses = statistics.total_clauses,
            "formula generated"
        );

        Ok(Encoding {
            tables: generator.into_tables(),
            statistics,
        })
    }

    /// Encode into a live CaDiCaL instance, solve, and decode the sorted lines
    pub fn solve(&self) -> Result<EncodedSolution> {
        let mut solver = SatSolver::with_preset(self.settings.solver.preset)?;
        let encoding = self.encode(&mut solver)?;

        // nothing to solve for an empty input
        if self.lines.is_empty() {
            return Ok(EncodedSolution {
                lines: Vec::new(),
                statistics: self.statistics_from(encoding.statistics, None),
            });
        }

        let solution = solver.solve()?;
        info!(seconds = solution.solve_time.as_secs_f64(), "solver returned a model");

        let lines = SolutionDecoder::new(&encoding.tables).decode(&solution);
        Ok(EncodedSolution {
            lines,
            statistics: self.statistics_from(encoding.statistics, Some(solver.statistics())),
        })
    }

    /// Write the formula as a DIMACS artifact
    pub fn write_dimacs<W: Write>(&self, out: W) -> Result<EncodingStatistics> {
        let mut writer = DimacsWriter::new(out)?;
        let encoding = self.encode(&mut writer)?;
        Ok(self.statistics_from(encoding.statistics, None))
    }

    /// Decode a model produced by an external solver for [`Self::write_dimacs`]'s artifact
    pub fn decode_model(&self, solution: &SolverSolution) -> Result<Vec<Vec<u8>>> {
        self.check_capacity()?;
        // numbering is deterministic, so the tables can be rebuilt on their own
        let tables = VariableTables::allocate(self.lines.len(), self.lines.width(), &mut VariableManager::new())?;
        Ok(SolutionDecoder::new(&tables).decode(solution))
    }

    /// Generate the formula without keeping it, to report its size
    pub fn statistics(&self) -> Result<EncodingStatistics> {
        let mut counter = ClauseCounter::default();
        let encoding = self.encode(&mut counter)?;
        Ok(self.statistics_from(encoding.statistics, None))
    }

    fn statistics_from(
        &self,
        constraints: ConstraintStatistics,
        solver: Option<SolverStatistics>,
    ) -> EncodingStatistics {
        EncodingStatistics {
            constraints,
            estimate: self.estimate_complexity(),
            solver,
        }
    }

    fn check_capacity(&self) -> Result<()> {
        let estimate = self.estimate_complexity();
        if estimate.estimated_variables > MAX_VARIABLES as u64 {
            return Err(SortError::VariableOverflow { limit: MAX_VARIABLES });
        }
        Ok(())
    }

    /// Exact size of the formula, computed in closed form
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let n = self.lines.len() as u64;
        let w = self.lines.width() as u64;

        let commanders = n.saturating_sub(3);
        let amo_clauses = match n {
            0 | 1 => 0,
            2 => 1,
            _ => 3 * n - 6,
        };
        let chain_clauses = if w > 0 { 3 * w - 2 } else { 0 };

        let estimated_variables = 2 * n * w
            + n * n
            + n.saturating_sub(1) * w.saturating_sub(1)
            + 2 * n * commanders;
        let estimated_clauses = n * w
            + 2 * n * n * w
            + 2 * n * (1 + amo_clauses)
            + n.saturating_sub(1) * chain_clauses;

        let complexity_level = if estimated_clauses < 10_000 {
            ComplexityLevel::Low
        } else if estimated_clauses < 1_000_000 {
            ComplexityLevel::Medium
        } else if estimated_clauses < 100_000_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            lines: self.lines.len(),
            width: self.lines.width(),
            estimated_variables,
            estimated_clauses,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone, Serialize)]
pub struct EncodingStatistics {
    pub constraints: ConstraintStatistics,
    pub estimate: ComplexityEstimate,
    pub solver: Option<SolverStatistics>,
}

/// Complexity estimate for the problem
#[derive(Debug, Clone, Serialize)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub lines: usize,
    pub width: usize,
    pub estimated_variables: u64,
    pub estimated_clauses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.constraints)?;
        write!(f, "{}", self.estimate)?;
        if let Some(solver) = &self.solver {
            write!(f, "{}", solver)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Lines: {}, width: {} bits", self.lines, self.width)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to solve",
            ComplexityLevel::High => "Likely to be slow; the channeling clauses grow as N² * W",
            ComplexityLevel::VeryHigh => "Very large formula, consider fewer or shorter lines",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(lines: &[&str]) -> SatEncoder {
        let lines = lines.iter().map(|line| line.as_bytes().to_vec()).collect();
        SatEncoder::new(Settings::default(), PaddedLines::new(lines))
    }

    #[test]
    fn test_estimate_matches_generation() {
        for lines in [
            vec![],
            vec![""],
            vec!["a"],
            vec!["b", "a"],
            vec!["", ""],
            vec!["banana", "apple", "cherry"],
            vec!["d", "c", "b", "a", "e"],
            vec!["zz", "y", "xxx", "w", "v", "u", "t"],
        ] {
            let encoder = encoder(&lines);
            let estimate = encoder.estimate_complexity();
            let stats = encoder.statistics().unwrap();

            assert_eq!(
                estimate.estimated_variables,
                stats.constraints.variables.total_variables as u64,
                "variables for {:?}",
                lines
            );
            assert_eq!(
                estimate.estimated_clauses,
                stats.constraints.total_clauses as u64,
                "clauses for {:?}",
                lines
            );
        }
    }

    #[test]
    fn test_solve_small_input() {
        let solution = encoder(&["banana", "apple", "cherry"]).solve().unwrap();
        assert_eq!(
            solution.lines,
            vec![b"apple".to_vec(), b"banana".to_vec(), b"cherry".to_vec()]
        );
        assert!(solution.statistics.solver.is_some());
    }

    #[test]
    fn test_solve_empty_input() {
        let solution = encoder(&[]).solve().unwrap();
        assert!(solution.lines.is_empty());
        assert!(solution.statistics.solver.is_none());
    }

    #[test]
    fn test_dimacs_header_counts() {
        let mut out = Vec::new();
        let stats = encoder(&["b", "a"]).write_dimacs(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("p cnf 43 110"));
        assert_eq!(lines.count(), stats.constraints.total_clauses);
    }

    #[test]
    fn test_decode_external_model() {
        let encoder = encoder(&["kiwi", "fig", "apple"]);

        let mut solver = SatSolver::new();
        encoder.encode(&mut solver).unwrap();
        let solution = solver.solve().unwrap();

        let decoded = encoder.decode_model(&solution).unwrap();
        assert_eq!(decoded, vec![b"apple".to_vec(), b"fig".to_vec(), b"kiwi".to_vec()]);
    }

    #[test]
    fn test_complexity_levels() {
        assert_eq!(encoder(&["a", "b"]).estimate_complexity().complexity_level, ComplexityLevel::Low);

        let many: Vec<String> = (0..200).map(|i| format!("{:032}", i)).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        // 2 * 200² * 256 channeling clauses alone
        assert_eq!(encoder(&many).estimate_complexity().complexity_level, ComplexityLevel::High);
    }
}
