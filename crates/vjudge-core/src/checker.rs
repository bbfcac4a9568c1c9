//! Assertion checking against an opened waveform trace.

use crate::result::Test;
use crate::trace::WaveformTrace;
use tracing::debug;

/// Evaluate every assertion of `test` in file order and record the outcome.
///
/// Comparison is exact string equality, no normalization. A signal the
/// trace does not know fails the assertion with an empty recorded actual
/// value. Returns the number of assertions that passed.
pub fn check_assertions(test: &mut Test, trace: &impl WaveformTrace) -> usize {
    let mut passed = 0;
    for result in &mut test.assertion_results {
        let assertion = &result.assertion;
        match trace.signal_value(&assertion.signal_name, assertion.timestamp) {
            Some(actual) => {
                result.passed = actual == assertion.expected_value;
                result.actual_value = actual.to_string();
            }
            None => {
                result.passed = false;
                result.actual_value.clear();
            }
        }
        if result.passed {
            passed += 1;
        } else {
            debug!(
                test = %test.name,
                signal = %assertion.signal_name,
                timestamp = assertion.timestamp,
                expected = %assertion.expected_value,
                actual = %result.actual_value,
                "assertion failed"
            );
        }
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{Assertion, AssertionResult};
    use std::collections::HashMap;

    /// In-memory trace fake keyed by (signal, timestamp).
    pub struct FakeTrace(pub HashMap<(String, u64), String>);

    impl FakeTrace {
        fn with(values: &[(&str, u64, &str)]) -> Self {
            FakeTrace(
                values
                    .iter()
                    .map(|(s, t, v)| ((s.to_string(), *t), v.to_string()))
                    .collect(),
            )
        }
    }

    impl WaveformTrace for FakeTrace {
        fn signal_value(&self, signal: &str, timestamp: u64) -> Option<&str> {
            self.0
                .get(&(signal.to_string(), timestamp))
                .map(|v| v.as_str())
        }
    }

    fn test_with(assertions: &[(&str, u64, &str)]) -> Test {
        Test::new(
            "t".to_string(),
            assertions
                .iter()
                .map(|(signal, timestamp, expected)| {
                    AssertionResult::pending(Assertion {
                        signal_name: signal.to_string(),
                        expected_value: expected.to_string(),
                        timestamp: *timestamp,
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn test_matching_value_passes() {
        let mut test = test_with(&[("out", 5, "1")]);
        let trace = FakeTrace::with(&[("out", 5, "1")]);

        assert_eq!(check_assertions(&mut test, &trace), 1);
        assert!(test.assertion_results[0].passed);
        assert_eq!(test.assertion_results[0].actual_value, "1");
    }

    #[test]
    fn test_mismatch_records_actual_value() {
        let mut test = test_with(&[("out", 5, "1")]);
        let trace = FakeTrace::with(&[("out", 5, "0")]);

        assert_eq!(check_assertions(&mut test, &trace), 0);
        assert!(!test.assertion_results[0].passed);
        assert_eq!(test.assertion_results[0].actual_value, "0");
    }

    #[test]
    fn test_unknown_signal_fails_with_empty_actual() {
        let mut test = test_with(&[("missing", 5, "1")]);
        let trace = FakeTrace::with(&[]);

        assert_eq!(check_assertions(&mut test, &trace), 0);
        assert!(!test.assertion_results[0].passed);
        assert!(test.assertion_results[0].actual_value.is_empty());
    }

    #[test]
    fn test_comparison_is_exact_text() {
        // "01" != "1": no numeric coercion.
        let mut test = test_with(&[("out", 5, "1")]);
        let trace = FakeTrace::with(&[("out", 5, "01")]);

        assert_eq!(check_assertions(&mut test, &trace), 0);
        assert_eq!(test.assertion_results[0].actual_value, "01");
    }

    #[test]
    fn test_all_assertions_checked_in_order() {
        let mut test = test_with(&[("a", 0, "0"), ("a", 5, "1"), ("b", 5, "x")]);
        let trace = FakeTrace::with(&[("a", 0, "0"), ("a", 5, "0"), ("b", 5, "x")]);

        assert_eq!(check_assertions(&mut test, &trace), 2);
        let passed: Vec<bool> = test.assertion_results.iter().map(|r| r.passed).collect();
        assert_eq!(passed, vec![true, false, true]);
    }
}
