//! Error taxonomy for judge runs.
//!
//! Every variant is run-fatal: the orchestrator records the first one on
//! the [`JudgeResult`](crate::result::JudgeResult) and stops processing
//! further tests. Assertion mismatches are not errors; they are ordinary
//! recorded failures.
//!
//! Variants carry owned strings (not `io::Error` sources) so results stay
//! `Clone + Serialize` for machine-readable reports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JudgeError {
    /// Test directory missing or unreadable
    #[error("failed to open tests directory {path}: {reason}")]
    OpeningTestsDirectory { path: String, reason: String },

    /// Source directory missing or unreadable
    #[error("failed to open sources directory {path}: {reason}")]
    OpeningSrcsDirectory { path: String, reason: String },

    /// An explicitly supplied source path missing or unreadable
    #[error("failed to open source file {path}: {reason}")]
    OpeningSourceFile { path: String, reason: String },

    /// A test bench has no companion assertion file
    #[error("assertion file {path} does not exist: {reason}")]
    AssertionsFileNotExists { path: String, reason: String },

    /// An assertion line does not match `<timestamp> <signal>=<value>`
    #[error("assertion file {path} is malformed at line {line}")]
    AssertionsFileWrongFormat { path: String, line: usize },

    /// The external toolchain failed to produce a runnable simulation
    #[error("toolchain failed for test bench {bench}: {detail}")]
    CompilingVerilogFile { bench: String, detail: String },

    /// The produced waveform trace could not be opened or parsed
    #[error("failed to open VCD trace {path}: {reason}")]
    OpeningVcdFile { path: String, reason: String },
}

/// Result type for judge operations
pub type Result<T> = std::result::Result<T, JudgeError>;
