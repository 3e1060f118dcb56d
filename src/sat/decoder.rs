//! Reading satisfying assignments back into lines

use super::solver::SolverSolution;
use super::variables::{Literal, VariableTables};
use crate::error::{Result, SolveOutcome, SortError};
use std::collections::HashMap;
use std::io::BufRead;
use std::time::Duration;

/// Rebuilds the sorted lines from the `Output` table of a model
pub struct SolutionDecoder<'a> {
    tables: &'a VariableTables,
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(tables: &'a VariableTables) -> Self {
        Self { tables }
    }

    /// Decode every sorted position, in order
    pub fn decode(&self, solution: &SolverSolution) -> Vec<Vec<u8>> {
        let (lines, _) = self.tables.dimensions();
        (0..lines)
            .map(|position| self.decode_line(position, solution))
            .collect()
    }

    /// Pack `Output[position]` into bytes, MSB first, up to the first zero byte
    pub fn decode_line(&self, position: usize, solution: &SolverSolution) -> Vec<u8> {
        let (_, width) = self.tables.dimensions();
        let mut line = Vec::with_capacity(width / 8);

        for byte_index in 0..width / 8 {
            let byte = (0..8).fold(0u8, |byte, offset| {
                let variable = self.tables.output(position, 8 * byte_index + offset);
                byte << 1 | u8::from(solution.value(variable))
            });
            if byte == 0 {
                break;
            }
            line.push(byte);
        }

        line
    }
}

/// Parse a solver result file.
///
/// Accepts the competition format (`s SATISFIABLE` followed by `v ... 0`
/// lines, `c` comments) and the MiniSat result format (`SAT` followed by a
/// literal line). Any status other than satisfiable is fatal.
pub fn read_model<R: BufRead>(reader: R) -> Result<SolverSolution> {
    let mut status = None;
    let mut assignment = HashMap::new();
    let mut line_number = 0;

    for line in reader.lines() {
        let line = line?;
        line_number += 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('c') {
            continue;
        }

        let mut tokens = text.split_whitespace();
        let literals = match tokens.next() {
            Some("s") => {
                let word = tokens.collect::<Vec<_>>().join(" ");
                status = Some(parse_status(&word).ok_or_else(|| SortError::MalformedModel {
                    line: line_number,
                    reason: format!("unknown solver status '{}'", word),
                })?);
                continue;
            }
            Some(word @ ("SAT" | "UNSAT" | "INDET")) if status.is_none() => {
                status = parse_status(word);
                continue;
            }
            Some("v") => tokens.collect::<Vec<_>>(),
            Some(_) if status.is_some() => text.split_whitespace().collect(),
            Some(token) => {
                return Err(SortError::MalformedModel {
                    line: line_number,
                    reason: format!("unexpected '{}' before the solver status", token),
                })
            }
            None => continue,
        };

        for token in literals {
            let literal: Literal = token.parse().map_err(|_| SortError::MalformedModel {
                line: line_number,
                reason: format!("'{}' is not a literal", token),
            })?;
            if literal == 0 {
                continue;
            }
            let variable = literal.checked_abs().ok_or_else(|| SortError::MalformedModel {
                line: line_number,
                reason: format!("literal {} is out of range", literal),
            })?;
            assignment.insert(variable, literal > 0);
        }
    }

    match status {
        Some(SolveOutcome::Satisfiable) => Ok(SolverSolution {
            assignment,
            solve_time: Duration::ZERO,
        }),
        Some(outcome) => Err(SortError::NotSatisfiable { outcome }),
        None => Err(SortError::MalformedModel {
            line: line_number,
            reason: "missing solver status".to_string(),
        }),
    }
}

fn parse_status(word: &str) -> Option<SolveOutcome> {
    match word {
        "SATISFIABLE" | "SAT" => Some(SolveOutcome::Satisfiable),
        "UNSATISFIABLE" | "UNSAT" => Some(SolveOutcome::Unsatisfiable),
        "UNKNOWN" | "INDET" => Some(SolveOutcome::Unknown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variables::VariableManager;

    fn solution_for(tables: &VariableTables, rows: &[&[u8]]) -> SolverSolution {
        let (_, width) = tables.dimensions();
        let mut assignment = HashMap::new();
        for (position, row) in rows.iter().enumerate() {
            for bit in 0..width {
                let value = row.get(bit / 8).map_or(false, |byte| byte & (0x80 >> (bit % 8)) != 0);
                assignment.insert(tables.output(position, bit), value);
            }
        }
        SolverSolution {
            assignment,
            solve_time: Duration::ZERO,
        }
    }

    #[test]
    fn test_decode_strips_padding() {
        let mut vm = VariableManager::new();
        let tables = VariableTables::allocate(3, 24, &mut vm).unwrap();
        let solution = solution_for(&tables, &[b"", b"ab", b"abc"]);

        let decoded = SolutionDecoder::new(&tables).decode(&solution);
        assert_eq!(decoded, vec![b"".to_vec(), b"ab".to_vec(), b"abc".to_vec()]);
    }

    #[test]
    fn test_decode_stops_at_first_zero_byte() {
        let mut vm = VariableManager::new();
        let tables = VariableTables::allocate(1, 24, &mut vm).unwrap();
        let solution = solution_for(&tables, &[&[b'x', 0, b'y']]);

        assert_eq!(SolutionDecoder::new(&tables).decode_line(0, &solution), b"x");
    }

    #[test]
    fn test_read_competition_model() {
        let text = "c comment\ns SATISFIABLE\nv 1 -2\nv 3 0\n";
        let solution = read_model(text.as_bytes()).unwrap();
        assert!(solution.value(1));
        assert!(!solution.value(2));
        assert!(solution.value(3));
    }

    #[test]
    fn test_read_minisat_model() {
        let solution = read_model("SAT\n-1 2 0\n".as_bytes()).unwrap();
        assert!(!solution.value(1));
        assert!(solution.value(2));
    }

    #[test]
    fn test_read_unsat_model_is_fatal() {
        let err = read_model("s UNSATISFIABLE\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SortError::NotSatisfiable { outcome: SolveOutcome::Unsatisfiable }));

        let err = read_model("UNSAT\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SortError::NotSatisfiable { .. }));
    }

    #[test]
    fn test_read_malformed_model() {
        assert!(matches!(
            read_model("v 1 2 0\n".as_bytes()),
            Err(SortError::MalformedModel { line: 1, .. })
        ));
        assert!(matches!(
            read_model("s SATISFIABLE\nv 1 x 0\n".as_bytes()),
            Err(SortError::MalformedModel { line: 2, .. })
        ));
        assert!(matches!(
            read_model("s SATISFIABLE\nv 1 -2147483648 0\n".as_bytes()),
            Err(SortError::MalformedModel { line: 2, .. })
        ));
        assert!(matches!(
            read_model("".as_bytes()),
            Err(SortError::MalformedModel { .. })
        ));
    }
}
