use satsort::config::Settings;
use satsort::lines::{is_sorted, PaddedLines};
use satsort::sat::{ClauseSink, ConstraintGenerator, SatSolver};
use satsort::{sort_lines, SortError, SortProblem};
use std::collections::HashSet;

fn lines(items: &[&str]) -> Vec<Vec<u8>> {
    items.iter().map(|item| item.as_bytes().to_vec()).collect()
}

fn sorted(items: &[&str]) -> Vec<Vec<u8>> {
    sort_lines(Settings::default(), lines(items)).unwrap()
}

#[test]
fn test_empty_input() {
    assert!(sorted(&[]).is_empty());

    let problem = SortProblem::new(Settings::default(), Vec::new()).unwrap();
    let mut artifact = Vec::new();
    problem.write_artifact(&mut artifact).unwrap();
    assert_eq!(String::from_utf8(artifact).unwrap(), "p cnf 0 0\n");
}

#[test]
fn test_single_line() {
    assert_eq!(sorted(&["hello"]), lines(&["hello"]));
}

#[test]
fn test_three_words() {
    assert_eq!(
        sorted(&["banana", "apple", "cherry"]),
        lines(&["apple", "banana", "cherry"])
    );
}

#[test]
fn test_duplicates() {
    let output = sorted(&["b", "a", "b"]);
    assert_eq!(output, lines(&["a", "b", "b"]));
}

#[test]
fn test_already_sorted_is_unchanged() {
    let input = ["alpha", "beta", "beta", "gamma", "zeta"];
    let output = sorted(&input);
    assert_eq!(output, lines(&input));
    assert_eq!(sorted(&input), output);
}

#[test]
fn test_prefix_sorts_first() {
    assert_eq!(sorted(&["abc", "ab", "a", ""]), lines(&["", "a", "ab", "abc"]));
}

#[test]
fn test_high_bytes_and_crlf_input() {
    let input = b"\xff\r\nz\n\x80x\r\n".to_vec();
    let read = satsort::lines::read_lines(&input[..], &Settings::default().limits).unwrap();
    let output = sort_lines(Settings::default(), read).unwrap();
    assert_eq!(output, vec![b"z".to_vec(), b"\x80x".to_vec(), b"\xff".to_vec()]);
}

#[test]
fn test_artifact_header_matches_body() {
    let problem = SortProblem::new(Settings::default(), lines(&["b", "a"])).unwrap();
    let mut artifact = Vec::new();
    let statistics = problem.write_artifact(&mut artifact).unwrap();

    let text = String::from_utf8(artifact).unwrap();
    let mut rows = text.lines();
    let header: Vec<&str> = rows.next().unwrap().split_whitespace().collect();
    assert_eq!(header[..2], ["p", "cnf"]);
    let declared_variables: usize = header[2].parse().unwrap();
    let declared_clauses: usize = header[3].parse().unwrap();

    let mut variables = HashSet::new();
    let mut clauses = 0;
    for row in rows {
        let literals: Vec<i32> = row.split_whitespace().map(|t| t.parse().unwrap()).collect();
        assert_eq!(literals.last(), Some(&0));
        for literal in &literals[..literals.len() - 1] {
            variables.insert(literal.unsigned_abs());
        }
        clauses += 1;
    }

    assert_eq!(declared_variables, variables.len());
    assert_eq!(declared_clauses, clauses);
    assert_eq!((declared_variables, declared_clauses), (43, 110));
    assert_eq!(statistics.constraints.total_clauses, clauses);
}

#[test]
fn test_limits_are_fatal() {
    let mut settings = Settings::default();
    settings.limits.max_line_length = 4;
    let err = sort_lines(settings, lines(&["short", "a"])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SortError>(),
        Some(SortError::LineTooLong { line: 1, length: 5, limit: 4 })
    ));
}

fn map_projection_models(items: &[&str]) -> usize {
    let padded = PaddedLines::new(lines(items));
    let mut generator = ConstraintGenerator::new(&padded).unwrap();
    let mut solver = SatSolver::new();
    generator.generate_all_constraints(&mut solver).unwrap();

    let projection = generator.tables().map_variables().to_vec();
    let solutions = solver.solve_multiple(16, &projection).unwrap();
    for solution in &solutions {
        let output: Vec<Vec<u8>> = (0..padded.len())
            .map(|position| {
                let line = (0..padded.len())
                    .find(|&line| solution.value(generator.tables().map(line, position)))
                    .unwrap();
                padded.lines()[line].clone()
            })
            .collect();
        assert!(is_sorted(&output));
    }
    solutions.len()
}

#[test]
fn test_only_duplicates_leave_freedom() {
    assert_eq!(map_projection_models(&["b", "a", "b"]), 2);
    assert_eq!(map_projection_models(&["c", "a", "b"]), 1);
    assert_eq!(map_projection_models(&["x", "x", "x"]), 6);
}

#[test]
fn test_solver_sink_sees_every_clause() {
    let padded = PaddedLines::new(lines(&["b", "a"]));
    let mut generator = ConstraintGenerator::new(&padded).unwrap();
    let mut solver = SatSolver::new();
    generator.generate_all_constraints(&mut solver).unwrap();

    assert_eq!(solver.clause_count(), 110);
    assert_eq!(solver.variable_count(), 43);
    // one more unit clause still goes through the same sink
    solver.add_clause(&[generator.tables().map(0, 1)]).unwrap();
    assert!(solver.solve().is_ok());
}
