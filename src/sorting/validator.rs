//! Validation of decoded sort results

use crate::lines::{first_disorder, padded_cmp};
use itertools::Itertools;
use std::collections::HashMap;

/// Checks a decoded result against its input
pub struct SortValidator;

/// Result of sort validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub multiset_preserved: bool,
    pub ordered: bool,
    /// Index `i` such that `output[i] > output[i + 1]`
    pub first_disorder: Option<usize>,
    /// Lines whose number of occurrences differs between input and output
    pub mismatched_lines: Vec<Vec<u8>>,
    pub error_message: Option<String>,
}

impl SortValidator {
    /// Output must be a permutation of the input, in non-decreasing order
    pub fn validate(input: &[Vec<u8>], output: &[Vec<u8>]) -> ValidationResult {
        let mismatched_lines = Self::multiset_difference(input, output);
        let multiset_preserved = mismatched_lines.is_empty() && input.len() == output.len();
        let first_disorder = first_disorder(output);
        let ordered = first_disorder.is_none();
        let is_valid = multiset_preserved && ordered;

        let error_message = if is_valid {
            None
        } else {
            Some(Self::generate_error_message(output, &mismatched_lines, first_disorder))
        };

        ValidationResult {
            is_valid,
            multiset_preserved,
            ordered,
            first_disorder,
            mismatched_lines,
            error_message,
        }
    }

    fn multiset_difference(input: &[Vec<u8>], output: &[Vec<u8>]) -> Vec<Vec<u8>> {
        let mut balance: HashMap<&[u8], i64> = HashMap::new();
        for line in input {
            *balance.entry(line.as_slice()).or_default() += 1;
        }
        for line in output {
            *balance.entry(line.as_slice()).or_default() -= 1;
        }

        balance
            .into_iter()
            .filter(|&(_, count)| count != 0)
            .map(|(line, _)| line.to_vec())
            .sorted_by(|a, b| padded_cmp(a, b).then_with(|| a.len().cmp(&b.len())))
            .collect()
    }

    /// Generate a descriptive error message from validation details
    fn generate_error_message(
        output: &[Vec<u8>],
        mismatched_lines: &[Vec<u8>],
        first_disorder: Option<usize>,
    ) -> String {
        let mut message = String::new();

        if !mismatched_lines.is_empty() {
            message.push_str(&format!(
                "{} distinct line(s) occur a different number of times in the output",
                mismatched_lines.len()
            ));
            let examples = mismatched_lines
                .iter()
                .take(3)
                .map(|line| format!("{:?}", String::from_utf8_lossy(line)))
                .join(", ");
            message.push_str(&format!(" (e.g. {}). ", examples));
        }

        if let Some(position) = first_disorder {
            message.push_str(&format!(
                "Output position {} ({:?}) sorts after position {} ({:?}).",
                position + 1,
                String::from_utf8_lossy(&output[position]),
                position + 2,
                String::from_utf8_lossy(&output[position + 1]),
            ));
        }

        message.trim_end().to_string()
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid {
            write!(f, "Output verified: sorted permutation of the input")
        } else {
            write!(
                f,
                "Output rejected: {}",
                self.error_message.as_deref().unwrap_or("unknown failure")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<Vec<u8>> {
        items.iter().map(|item| item.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_valid_sort() {
        let result = SortValidator::validate(&lines(&["b", "a", "b"]), &lines(&["a", "b", "b"]));
        assert!(result.is_valid);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_order_violation() {
        let result = SortValidator::validate(&lines(&["a", "b"]), &lines(&["b", "a"]));
        assert!(result.multiset_preserved);
        assert!(!result.ordered);
        assert_eq!(result.first_disorder, Some(0));
        assert!(result.error_message.unwrap().contains("position 1"));
    }

    #[test]
    fn test_lost_duplicate() {
        let result = SortValidator::validate(&lines(&["a", "b", "b"]), &lines(&["a", "a", "b"]));
        assert!(!result.is_valid);
        assert!(result.ordered);
        assert_eq!(result.mismatched_lines, lines(&["a", "b"]));
    }

    #[test]
    fn test_empty() {
        assert!(SortValidator::validate(&[], &[]).is_valid);
    }
}
