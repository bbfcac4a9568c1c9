//! Assertions and the assertion-file grammar.
//!
//! One assertion per line:
//!
//! ```text
//! <timestamp> <signal-name>=<expected-value>
//! ```
//!
//! The timestamp is a base-10 integer in the simulator's time unit. The
//! signal name is everything between the first space and the first `=`
//! (no trimming; layout is part of the token). The expected value is the
//! rest of the line, compared verbatim against the trace - bit-vector
//! literals are text, not numbers.

use crate::error::{JudgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One expected observation: signal, value, simulated timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// Signal name as written in the assertion file.
    pub signal_name: String,

    /// Expected value, opaque and compared verbatim.
    pub expected_value: String,

    /// Simulation timestamp to sample at.
    pub timestamp: u64,
}

/// Outcome of checking one assertion against a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was checked.
    pub assertion: Assertion,

    /// Whether the observed value matched the expected one.
    pub passed: bool,

    /// Value observed in the trace; empty until checked, and empty when
    /// the signal was not found.
    pub actual_value: String,
}

impl AssertionResult {
    /// An unchecked result for a freshly parsed assertion.
    pub fn pending(assertion: Assertion) -> Self {
        AssertionResult {
            assertion,
            passed: false,
            actual_value: String::new(),
        }
    }
}

/// Parse an assertion file into pending results, in file order.
///
/// The file may be empty (a test with no assertions trivially passes).
/// A missing file is [`JudgeError::AssertionsFileNotExists`]; the first
/// line that fails the grammar is [`JudgeError::AssertionsFileWrongFormat`]
/// and aborts parsing.
pub fn parse_assertions(path: &Path) -> Result<Vec<AssertionResult>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| JudgeError::AssertionsFileNotExists {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    parse_assertion_text(path, &content)
}

fn parse_assertion_text(path: &Path, content: &str) -> Result<Vec<AssertionResult>> {
    let mut results = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let assertion =
            parse_assertion_line(line).ok_or_else(|| JudgeError::AssertionsFileWrongFormat {
                path: path.display().to_string(),
                line: index + 1,
            })?;
        results.push(AssertionResult::pending(assertion));
    }
    Ok(results)
}

/// Parse one `<timestamp> <signal>=<value>` line.
fn parse_assertion_line(line: &str) -> Option<Assertion> {
    let (timestamp, rest) = line.split_once(' ')?;
    let timestamp = timestamp.parse::<u64>().ok()?;
    let (signal_name, expected_value) = rest.split_once('=')?;
    if signal_name.is_empty() || expected_value.is_empty() {
        return None;
    }
    Some(Assertion {
        signal_name: signal_name.to_string(),
        expected_value: expected_value.to_string(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(content: &str) -> Result<Vec<AssertionResult>> {
        parse_assertion_text(Path::new("t-assertion.txt"), content)
    }

    #[test]
    fn test_parse_single_assertion() {
        let results = parse_text("5 out=1\n").unwrap();
        assert_eq!(results.len(), 1);
        let a = &results[0].assertion;
        assert_eq!(a.timestamp, 5);
        assert_eq!(a.signal_name, "out");
        assert_eq!(a.expected_value, "1");
        assert!(!results[0].passed);
        assert!(results[0].actual_value.is_empty());
    }

    #[test]
    fn test_parse_preserves_file_order_and_duplicates() {
        let results = parse_text("0 out=0\n5 out=1\n5 out=1\n").unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].assertion.timestamp, 0);
        assert_eq!(results[1].assertion, results[2].assertion);
    }

    #[test]
    fn test_vector_value_is_opaque_text() {
        let results = parse_text("10 data=8'b00001010\n").unwrap();
        assert_eq!(results[0].assertion.expected_value, "8'b00001010");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let results = parse_text("1 s=a=b\n").unwrap();
        assert_eq!(results[0].assertion.signal_name, "s");
        assert_eq!(results[0].assertion.expected_value, "a=b");
    }

    #[test]
    fn test_empty_file_is_valid() {
        assert!(parse_text("").unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_timestamp_is_wrong_format() {
        let err = parse_text("abc sig=1\n").unwrap_err();
        assert!(matches!(
            err,
            JudgeError::AssertionsFileWrongFormat { line: 1, .. }
        ));
    }

    #[test]
    fn test_negative_timestamp_is_wrong_format() {
        assert!(parse_text("-5 sig=1\n").is_err());
    }

    #[test]
    fn test_missing_equals_is_wrong_format() {
        let err = parse_text("5 out=1\n7 broken\n").unwrap_err();
        assert!(matches!(
            err,
            JudgeError::AssertionsFileWrongFormat { line: 2, .. }
        ));
    }

    #[test]
    fn test_blank_line_is_wrong_format() {
        assert!(parse_text("5 out=1\n\n6 out=0\n").is_err());
    }

    #[test]
    fn test_empty_signal_or_value_is_wrong_format() {
        assert!(parse_text("5 =1\n").is_err());
        assert!(parse_text("5 out=\n").is_err());
    }

    #[test]
    fn test_missing_file_is_not_exists() {
        let err = parse_assertions(Path::new("/nonexistent/foo-assertion.txt")).unwrap_err();
        assert!(matches!(err, JudgeError::AssertionsFileNotExists { .. }));
    }
}
