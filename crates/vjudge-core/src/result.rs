//! Run configuration and result model.

use crate::assertion::AssertionResult;
use crate::error::JudgeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One named test scenario: a bench file plus its parsed assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Test {
    /// Test name, unique within a run (the `<name>` of `<name>-test.v`).
    pub name: String,

    /// Whether every assertion passed. Set once, after simulation.
    pub passed: bool,

    /// Number of assertions that passed. Set once, after simulation.
    pub passed_assertions_count: usize,

    /// Per-assertion outcomes, in assertion-file order.
    pub assertion_results: Vec<AssertionResult>,
}

impl Test {
    /// A discovered test whose assertions have not been checked yet.
    pub fn new(name: String, assertion_results: Vec<AssertionResult>) -> Self {
        Test {
            name,
            passed: false,
            passed_assertions_count: 0,
            assertion_results,
        }
    }

    /// Total number of assertions in this test.
    pub fn assertions_count(&self) -> usize {
        self.assertion_results.len()
    }
}

/// Where candidate source files come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceSet {
    /// Scan a directory for regular files (non-recursive).
    Directory(PathBuf),

    /// An explicit, caller-supplied list of source file paths.
    Files(Vec<PathBuf>),
}

/// Run configuration, read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeInput {
    /// Directory holding `<name>-test.v` and `<name>-assertion.txt` pairs.
    pub test_dir: PathBuf,

    /// Candidate implementation(s) under test.
    pub sources: SourceSet,
}

/// Outcome of one judge run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JudgeResult {
    /// Whether every test passed and no fatal error occurred.
    pub passed: bool,

    /// Tests that passed so far.
    pub passed_tests_count: usize,

    /// Tests discovered for this run.
    pub tests_count: usize,

    /// Per-test results, in discovery order.
    pub tests: Vec<Test>,

    /// First fatal error encountered, if any.
    pub error: Option<JudgeError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{Assertion, AssertionResult};

    #[test]
    fn test_new_test_is_unchecked() {
        let test = Test::new(
            "adder".to_string(),
            vec![AssertionResult::pending(Assertion {
                signal_name: "out".to_string(),
                expected_value: "1".to_string(),
                timestamp: 5,
            })],
        );
        assert!(!test.passed);
        assert_eq!(test.passed_assertions_count, 0);
        assert_eq!(test.assertions_count(), 1);
    }

    #[test]
    fn test_default_result_is_empty_and_unpassed() {
        let result = JudgeResult::default();
        assert!(!result.passed);
        assert_eq!(result.tests_count, 0);
        assert!(result.error.is_none());
    }
}
