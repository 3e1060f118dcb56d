//! SAT solver integration using CaDiCaL

use super::sink::ClauseSink;
use super::variables::{Literal, Variable};
use crate::config::SolverPreset;
use crate::error::{Result, SolveOutcome, SortError};
use cadical::Solver;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL, fed clause by clause
pub struct SatSolver {
    solver: Solver,
    pending: Vec<Literal>,
    variable_count: usize,
    clause_count: usize,
    last_solve: Option<(SolveOutcome, Duration)>,
}

/// Result of SAT solving
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<Variable, bool>,
    pub solve_time: Duration,
}

impl SolverSolution {
    /// Truth value of `variable`; unassigned variables read as false
    pub fn value(&self, variable: Variable) -> bool {
        self.assignment.get(&variable).copied().unwrap_or(false)
    }
}

/// Statistics about the solving process
#[derive(Debug, Clone, Serialize)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    pub result: Option<String>,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self::from_solver(Solver::new())
    }

    /// Create a solver using one of CaDiCaL's named configurations
    pub fn with_preset(preset: SolverPreset) -> Result<Self> {
        let solver = Solver::with_config(preset.as_str()).map_err(|e| {
            SortError::Config(format!("CaDiCaL rejected configuration '{}': {:?}", preset.as_str(), e))
        })?;
        Ok(Self::from_solver(solver))
    }

    fn from_solver(solver: Solver) -> Self {
        Self {
            solver,
            pending: Vec::new(),
            variable_count: 0,
            clause_count: 0,
            last_solve: None,
        }
    }

    /// Run the solver and report the raw outcome
    pub fn check(&mut self) -> SolveOutcome {
        let start_time = Instant::now();
        let outcome = match self.solver.solve() {
            Some(true) => SolveOutcome::Satisfiable,
            Some(false) => SolveOutcome::Unsatisfiable,
            None => SolveOutcome::Unknown,
        };
        self.last_solve = Some((outcome, start_time.elapsed()));
        outcome
    }

    /// Solve and return the model; anything but SAT is an error
    pub fn solve(&mut self) -> Result<SolverSolution> {
        let start_time = Instant::now();
        match self.check() {
            SolveOutcome::Satisfiable => Ok(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time: start_time.elapsed(),
            }),
            outcome => Err(SortError::NotSatisfiable { outcome }),
        }
    }

    /// Enumerate up to `max_solutions` models that differ on `projection`
    pub fn solve_multiple(
        &mut self,
        max_solutions: usize,
        projection: &[Variable],
    ) -> Result<Vec<SolverSolution>> {
        let mut solutions = Vec::new();
        let start_time = Instant::now();

        while solutions.len() < max_solutions {
            if self.check() != SolveOutcome::Satisfiable {
                break;
            }
            let solution = SolverSolution {
                assignment: self.extract_assignment(),
                solve_time: start_time.elapsed(),
            };

            // Add blocking clause to prevent finding the same projection again
            let blocked = self.add_blocking_clause(&solution, projection)?;
            solutions.push(solution);
            if !blocked {
                break;
            }
        }

        Ok(solutions)
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<Variable, bool> {
        let mut assignment = HashMap::new();

        for var in 1..=self.variable_count as Variable {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }

        assignment
    }

    fn add_blocking_clause(&mut self, solution: &SolverSolution, projection: &[Variable]) -> Result<bool> {
        if projection.is_empty() {
            return Ok(false);
        }
        let blocking: Vec<Literal> = projection
            .iter()
            .map(|&var| if solution.value(var) { -var } else { var })
            .collect();
        self.add_clause(&blocking)?;
        Ok(true)
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        let (result, solve_time) = match self.last_solve {
            Some((outcome, time)) => (Some(outcome.to_string()), time),
            None => (None, Duration::ZERO),
        };
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_time,
            result,
        }
    }

    /// Get the highest variable seen in a clause or declared at finish
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseSink for SatSolver {
    fn add_literal(&mut self, literal: Literal) -> Result<()> {
        debug_assert_ne!(literal, 0, "0 is the clause terminator");
        self.variable_count = self.variable_count.max(literal.unsigned_abs() as usize);
        self.pending.push(literal);
        Ok(())
    }

    fn end_clause(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Err(SortError::InvariantViolation {
                reason: "empty clause passed to the solver".to_string(),
            });
        }
        self.solver.add_clause(self.pending.drain(..));
        self.clause_count += 1;
        Ok(())
    }

    fn finish(&mut self, variable_count: usize) -> Result<()> {
        self.variable_count = self.variable_count.max(variable_count);
        Ok(())
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {}", self.result.as_deref().unwrap_or("not solved"))?;
        Ok(())
    }
}
