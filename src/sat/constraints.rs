//! Constraint generation for the sorting encoding
//!
//! Four clause families, always emitted in this order:
//!
//! 1. input fixing: unit clauses pinning `Input` to the padded line bits
//! 2. channeling: `Map[i][j]` forces `Output[j]` to equal `Input[i]`
//! 3. permutation: exactly one `Map` per row and per column
//! 4. ordering: a tie chain forcing `Output[i-1] <= Output[i]`, MSB first

use super::sink::ClauseSink;
use super::variables::{Literal, VariableManager, VariableStatistics, VariableTables};
use crate::error::Result;
use crate::lines::PaddedLines;
use itertools::Itertools;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Literal>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Literal) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: Literal, lit2: Literal) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseFamily {
    Input,
    Channeling,
    Permutation,
    Ordering,
}

/// Emit `¬x ∨ ¬y` for every pair of the given literals
pub fn forbid_pairs<S: ClauseSink + ?Sized>(literals: &[Literal], sink: &mut S) -> Result<usize> {
    let mut emitted = 0;
    for (&x, &y) in literals.iter().tuple_combinations() {
        sink.add_clause(&[-x, -y])?;
        emitted += 1;
    }
    Ok(emitted)
}

/// At most one of `group` may be true.
///
/// Groups of up to three literals get the pairwise clauses directly. Larger
/// groups are reduced front to back: the first two literals and a fresh
/// commander `c` are made pairwise exclusive, and `¬c`, which is implied by
/// either of the two, joins the back of the queue in their place. Each step
/// costs three clauses and one variable, so the total is linear.
///
/// Returns the number of clauses emitted.
pub fn at_most_one<S: ClauseSink + ?Sized>(
    group: &[Literal],
    variables: &mut VariableManager,
    sink: &mut S,
) -> Result<usize> {
    let mut queue: VecDeque<Literal> = group.iter().copied().collect();
    let mut emitted = 0;

    while queue.len() >= 4 {
        let window: Vec<Literal> = queue.drain(..2).collect();
        let commander = variables.commander()?;
        emitted += forbid_pairs(&[window[0], window[1], commander], sink)?;
        queue.push_back(-commander);
    }

    let rest: Vec<Literal> = queue.into_iter().collect();
    emitted += forbid_pairs(&rest, sink)?;
    Ok(emitted)
}

/// Generates the SAT constraints for sorting a set of lines
pub struct ConstraintGenerator<'a> {
    lines: &'a PaddedLines,
    variables: VariableManager,
    tables: VariableTables,
    counts: ClauseCounts,
}

#[derive(Debug, Default, Clone, Copy)]
struct ClauseCounts {
    input: usize,
    channeling: usize,
    permutation: usize,
    ordering: usize,
    literals: usize,
}

impl<'a> ConstraintGenerator<'a> {
    /// Create a new constraint generator and allocate its variable tables
    pub fn new(lines: &'a PaddedLines) -> Result<Self> {
        Self::with_manager(lines, VariableManager::new())
    }

    /// Create a generator drawing variables from the given manager
    pub fn with_manager(lines: &'a PaddedLines, mut variables: VariableManager) -> Result<Self> {
        let tables = VariableTables::allocate(lines.len(), lines.width(), &mut variables)?;
        Ok(Self {
            lines,
            variables,
            tables,
            counts: ClauseCounts::default(),
        })
    }

    /// Generate every constraint family into `sink`, then finalize it
    pub fn generate_all_constraints<S: ClauseSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.generate_input_constraints(sink)?;
        self.generate_channeling_constraints(sink)?;
        self.generate_permutation_constraints(sink)?;
        self.generate_ordering_constraints(sink)?;

        debug!(
            input = self.counts.input,
            channeling = self.counts.channeling,
            permutation = self.counts.permutation,
            ordering = self.counts.ordering,
            commanders = self.variables.commander_count(),
            "constraint families generated"
        );

        sink.finish(self.variables.variable_count())
    }

    fn emit<S: ClauseSink + ?Sized>(
        &mut self,
        sink: &mut S,
        family: ClauseFamily,
        literals: &[Literal],
    ) -> Result<()> {
        sink.add_clause(literals)?;
        self.count(family, 1, literals.len());
        Ok(())
    }

    fn count(&mut self, family: ClauseFamily, clauses: usize, literals: usize) {
        match family {
            ClauseFamily::Input => self.counts.input += clauses,
            ClauseFamily::Channeling => self.counts.channeling += clauses,
            ClauseFamily::Permutation => self.counts.permutation += clauses,
            ClauseFamily::Ordering => self.counts.ordering += clauses,
        }
        self.counts.literals += literals;
    }

    /// Pin every input bit to its padded value
    fn generate_input_constraints<S: ClauseSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let (lines, width) = self.tables.dimensions();

        for line in 0..lines {
            for bit in 0..width {
                let variable = self.tables.input(line, bit);
                let literal = if self.lines.bit(line, bit) { variable } else { -variable };
                self.emit(sink, ClauseFamily::Input, &[literal])?;
            }
        }

        Ok(())
    }

    /// `Map[i][j] → (Output[j][k] ↔ Input[i][k])` for every bit
    fn generate_channeling_constraints<S: ClauseSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let (lines, width) = self.tables.dimensions();

        for line in 0..lines {
            for position in 0..lines {
                let mapped = self.tables.map(line, position);
                for bit in 0..width {
                    let input = self.tables.input(line, bit);
                    let output = self.tables.output(position, bit);
                    self.emit(sink, ClauseFamily::Channeling, &[-mapped, -input, output])?;
                    self.emit(sink, ClauseFamily::Channeling, &[-mapped, input, -output])?;
                }
            }
        }

        Ok(())
    }

    /// Exactly one `Map` per row, then exactly one per column
    fn generate_permutation_constraints<S: ClauseSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let (lines, _) = self.tables.dimensions();

        for line in 0..lines {
            let row: Vec<Literal> = (0..lines).map(|position| self.tables.map(line, position)).collect();
            self.exactly_one(&row, sink)?;
        }

        for position in 0..lines {
            let column: Vec<Literal> = (0..lines).map(|line| self.tables.map(line, position)).collect();
            self.exactly_one(&column, sink)?;
        }

        Ok(())
    }

    fn exactly_one<S: ClauseSink + ?Sized>(&mut self, group: &[Literal], sink: &mut S) -> Result<()> {
        let emitted = at_most_one(group, &mut self.variables, sink)?;
        self.count(ClauseFamily::Permutation, emitted, 2 * emitted);
        self.emit(sink, ClauseFamily::Permutation, group)
    }

    /// Adjacent output rows must be in non-decreasing big-endian order.
    ///
    /// `Tie[i][k]` is implied whenever rows `i - 1` and `i` agree on bits
    /// `0..k`; while it holds, a 1 above a 0 at bit `k` is forbidden. A
    /// strictly smaller bit leaves the next tie unconstrained.
    fn generate_ordering_constraints<S: ClauseSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let (lines, width) = self.tables.dimensions();

        for position in 1..lines {
            for bit in 0..width {
                let above = self.tables.output(position - 1, bit);
                let below = self.tables.output(position, bit);
                let has_next = bit + 1 < width;

                if bit == 0 {
                    self.emit(sink, ClauseFamily::Ordering, &[-above, below])?;
                    if has_next {
                        let next = self.tables.tie(position, 1);
                        self.emit(sink, ClauseFamily::Ordering, &[-above, next])?;
                        self.emit(sink, ClauseFamily::Ordering, &[below, next])?;
                    }
                } else {
                    let tie = self.tables.tie(position, bit);
                    self.emit(sink, ClauseFamily::Ordering, &[-tie, -above, below])?;
                    if has_next {
                        let next = self.tables.tie(position, bit + 1);
                        self.emit(sink, ClauseFamily::Ordering, &[-tie, -above, next])?;
                        self.emit(sink, ClauseFamily::Ordering, &[-tie, below, next])?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Get the variable tables (for decoding)
    pub fn tables(&self) -> &VariableTables {
        &self.tables
    }

    pub fn into_tables(self) -> VariableTables {
        self.tables
    }

    /// Get constraint generation statistics
    pub fn statistics(&self) -> ConstraintStatistics {
        let (lines, width) = self.tables.dimensions();
        let counts = self.counts;
        ConstraintStatistics {
            lines,
            width,
            input_clauses: counts.input,
            channeling_clauses: counts.channeling,
            permutation_clauses: counts.permutation,
            ordering_clauses: counts.ordering,
            total_clauses: counts.input + counts.channeling + counts.permutation + counts.ordering,
            total_literals: counts.literals,
            variables: self.tables.statistics(&self.variables),
        }
    }
}

/// Statistics about constraint generation
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintStatistics {
    pub lines: usize,
    pub width: usize,
    pub input_clauses: usize,
    pub channeling_clauses: usize,
    pub permutation_clauses: usize,
    pub ordering_clauses: usize,
    pub total_clauses: usize,
    pub total_literals: usize,
    pub variables: VariableStatistics,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Generation Statistics:")?;
        writeln!(f, "  Lines: {}", self.lines)?;
        writeln!(f, "  Width: {} bits", self.width)?;
        writeln!(f, "  Input clauses: {}", self.input_clauses)?;
        writeln!(f, "  Channeling clauses: {}", self.channeling_clauses)?;
        writeln!(f, "  Permutation clauses: {}", self.permutation_clauses)?;
        writeln!(f, "  Ordering clauses: {}", self.ordering_clauses)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Total literals: {}", self.total_literals)?;
        write!(f, "{}", self.variables)
    }
}
