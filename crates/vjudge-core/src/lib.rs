//! vjudge core - automated judging of Verilog exercises
//!
//! The pipeline, leaf first:
//! - Assertion parser: one `<timestamp> <signal>=<value>` assertion per line
//! - Test discovery: `<name>-test.v` benches paired with `<name>-assertion.txt`
//! - Source collection: a source directory or an explicit file list
//! - Toolchain runner: compile bench + sources, execute the simulation
//! - Assertion checker: compare expected signal values against the VCD trace
//! - Judge orchestrator: run every test, aggregate counts, stop on the
//!   first infrastructure error
//!
//! Assertion mismatches are tallied, never fatal; infrastructure and input
//! problems abort the run with a [`JudgeError`] recorded on the result.

pub mod assertion;
pub mod checker;
pub mod discovery;
pub mod error;
pub mod judge;
pub mod result;
pub mod toolchain;
pub mod trace;

// Re-export key types
pub use assertion::{Assertion, AssertionResult};
pub use checker::check_assertions;
pub use discovery::{collect_sources, discover_tests};
pub use error::{JudgeError, Result};
pub use judge::{run_judge, Judge};
pub use result::{JudgeInput, JudgeResult, SourceSet, Test};
pub use toolchain::{IcarusToolchain, Simulation, Toolchain, ToolchainConfig};
pub use trace::{TraceSource, VcdTraceSource, WaveformTrace};

/// vjudge core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
