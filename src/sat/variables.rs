//! Variable management for the sorting encoding

use crate::error::{Result, SortError};
use serde::Serialize;

/// Positive SAT variable identifier
pub type Variable = i32;

/// Signed literal; the sign is the polarity, 0 terminates a clause
pub type Literal = i32;

/// Largest identifier a literal can carry
pub const MAX_VARIABLES: usize = i32::MAX as usize;

/// Hands out fresh variable identifiers, starting at 1, never reused
#[derive(Debug)]
pub struct VariableManager {
    allocated: usize,
    limit: usize,
    commanders: usize,
}

impl VariableManager {
    /// Create a new variable manager
    pub fn new() -> Self {
        Self::with_limit(MAX_VARIABLES)
    }

    /// Create a manager that refuses to go past `limit` variables
    pub fn with_limit(limit: usize) -> Self {
        Self {
            allocated: 0,
            limit: limit.min(MAX_VARIABLES),
            commanders: 0,
        }
    }

    /// Allocate the next variable
    pub fn next(&mut self) -> Result<Variable> {
        if self.allocated >= self.limit {
            return Err(SortError::VariableOverflow { limit: self.limit });
        }
        self.allocated += 1;
        Ok(self.allocated as Variable)
    }

    /// Allocate an auxiliary variable for the at-most-one reduction
    pub fn commander(&mut self) -> Result<Variable> {
        let variable = self.next()?;
        self.commanders += 1;
        Ok(variable)
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        self.allocated
    }

    pub fn commander_count(&self) -> usize {
        self.commanders
    }
}

impl Default for VariableManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The four variable tables of the encoding, allocated once up front.
///
/// Numbering is deterministic: `Input` row-major, then `Map`, then
/// `Output`, then `Tie`. `Tie` only exists for positions `1..N` and bits
/// `1..W`.
#[derive(Debug, Clone)]
pub struct VariableTables {
    lines: usize,
    width: usize,
    input: Vec<Variable>,
    map: Vec<Variable>,
    output: Vec<Variable>,
    tie: Vec<Variable>,
}

impl VariableTables {
    /// Allocate every table for `lines` lines of `width` bits
    pub fn allocate(lines: usize, width: usize, manager: &mut VariableManager) -> Result<Self> {
        let tie_entries = lines.saturating_sub(1) * width.saturating_sub(1);

        let input = allocate_table("input", lines * width, manager)?;
        let map = allocate_table("map", lines * lines, manager)?;
        let output = allocate_table("output", lines * width, manager)?;
        let tie = allocate_table("tie", tie_entries, manager)?;

        Ok(Self {
            lines,
            width,
            input,
            map,
            output,
            tie,
        })
    }

    /// Get grid dimensions as (N, W)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.lines, self.width)
    }

    /// Bit `bit` of input line `line`
    #[inline]
    pub fn input(&self, line: usize, bit: usize) -> Variable {
        self.input[line * self.width + bit]
    }

    /// Input line `line` sits at sorted position `position`
    #[inline]
    pub fn map(&self, line: usize, position: usize) -> Variable {
        self.map[line * self.lines + position]
    }

    /// Bit `bit` of the line at sorted position `position`
    #[inline]
    pub fn output(&self, position: usize, bit: usize) -> Variable {
        self.output[position * self.width + bit]
    }

    /// Positions `position - 1` and `position` agree on bits `0..bit`
    #[inline]
    pub fn tie(&self, position: usize, bit: usize) -> Variable {
        debug_assert!(position >= 1 && bit >= 1);
        self.tie[(position - 1) * (self.width - 1) + (bit - 1)]
    }

    /// All `Map` variables, row-major
    pub fn map_variables(&self) -> &[Variable] {
        &self.map
    }

    /// Get statistics about variable usage
    pub fn statistics(&self, manager: &VariableManager) -> VariableStatistics {
        VariableStatistics {
            total_variables: manager.variable_count(),
            input_variables: self.input.len(),
            map_variables: self.map.len(),
            output_variables: self.output.len(),
            tie_variables: self.tie.len(),
            commander_variables: manager.commander_count(),
        }
    }
}

fn allocate_table(
    table: &'static str,
    entries: usize,
    manager: &mut VariableManager,
) -> Result<Vec<Variable>> {
    let mut variables = Vec::new();
    variables
        .try_reserve_exact(entries)
        .map_err(|_| SortError::AllocationFailed { table, entries })?;
    for _ in 0..entries {
        variables.push(manager.next()?);
    }
    Ok(variables)
}

/// Statistics about variable usage
#[derive(Debug, Clone, Serialize)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub input_variables: usize,
    pub map_variables: usize,
    pub output_variables: usize,
    pub tie_variables: usize,
    pub commander_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Input: {}", self.input_variables)?;
        writeln!(f, "  Map: {}", self.map_variables)?;
        writeln!(f, "  Output: {}", self.output_variables)?;
        writeln!(f, "  Tie: {}", self.tie_variables)?;
        writeln!(f, "  Commander: {}", self.commander_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_creation() {
        let mut vm = VariableManager::new();

        assert_eq!(vm.next().unwrap(), 1);
        assert_eq!(vm.next().unwrap(), 2);
        assert_eq!(vm.commander().unwrap(), 3);
        assert_eq!(vm.variable_count(), 3);
        assert_eq!(vm.commander_count(), 1);
    }

    #[test]
    fn test_overflow_is_fatal() {
        let mut vm = VariableManager::with_limit(2);
        vm.next().unwrap();
        vm.next().unwrap();
        assert!(matches!(vm.next(), Err(SortError::VariableOverflow { limit: 2 })));
    }

    #[test]
    fn test_table_layout() {
        let mut vm = VariableManager::new();
        let tables = VariableTables::allocate(2, 8, &mut vm).unwrap();

        // input 1..=16, map 17..=20, output 21..=36, tie 37..=43
        assert_eq!(tables.input(0, 0), 1);
        assert_eq!(tables.input(1, 7), 16);
        assert_eq!(tables.map(0, 0), 17);
        assert_eq!(tables.map(1, 0), 19);
        assert_eq!(tables.output(0, 0), 21);
        assert_eq!(tables.output(1, 7), 36);
        assert_eq!(tables.tie(1, 1), 37);
        assert_eq!(tables.tie(1, 7), 43);
        assert_eq!(vm.variable_count(), 43);
    }

    #[test]
    fn test_numbering_is_reproducible() {
        let mut first = VariableManager::new();
        let mut second = VariableManager::new();
        let a = VariableTables::allocate(3, 16, &mut first).unwrap();
        let b = VariableTables::allocate(3, 16, &mut second).unwrap();
        assert_eq!(a.map_variables(), b.map_variables());
        assert_eq!(a.tie(2, 15), b.tie(2, 15));
    }

    #[test]
    fn test_statistics() {
        let mut vm = VariableManager::new();
        let tables = VariableTables::allocate(3, 8, &mut vm).unwrap();

        let stats = tables.statistics(&vm);
        assert_eq!(stats.input_variables, 24);
        assert_eq!(stats.map_variables, 9);
        assert_eq!(stats.output_variables, 24);
        assert_eq!(stats.tie_variables, 14);
        assert_eq!(stats.total_variables, 71);
    }

    #[test]
    fn test_empty_dimensions() {
        let mut vm = VariableManager::new();
        let tables = VariableTables::allocate(0, 0, &mut vm).unwrap();
        assert_eq!(tables.dimensions(), (0, 0));
        assert_eq!(vm.variable_count(), 0);
    }
}
