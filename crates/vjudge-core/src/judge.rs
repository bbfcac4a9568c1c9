//! Judge orchestration.
//!
//! One run: discover tests, collect sources, then for each test
//! compile -> simulate -> check -> clean up, strictly sequential. Counts
//! accumulate on the shared result as tests complete, so callers holding
//! the result observe partial progress. The first fatal error is recorded
//! and freezes the run; tests already evaluated keep their results.

use crate::checker::check_assertions;
use crate::discovery::{collect_sources, discover_tests};
use crate::error::Result;
use crate::result::{JudgeInput, JudgeResult, Test};
use crate::toolchain::{IcarusToolchain, Toolchain, ToolchainConfig};
use crate::trace::{TraceSource, VcdTraceSource};
use std::path::{Path, PathBuf};
use tracing::info;

/// Judge over a concrete toolchain and trace source.
pub struct Judge<T: Toolchain, S: TraceSource> {
    toolchain: T,
    trace_source: S,
}

impl Judge<IcarusToolchain, VcdTraceSource> {
    /// Judge backed by Icarus Verilog and the VCD reader.
    pub fn with_config(config: ToolchainConfig) -> Self {
        Judge::new(IcarusToolchain::new(config), VcdTraceSource)
    }
}

impl<T: Toolchain, S: TraceSource> Judge<T, S> {
    pub fn new(toolchain: T, trace_source: S) -> Self {
        Judge {
            toolchain,
            trace_source,
        }
    }

    /// Run every discovered test against the candidate source set.
    ///
    /// Never returns `Err`: fatal errors are recorded on the result, which
    /// also keeps whatever tests completed before the abort.
    pub async fn run(&self, input: &JudgeInput) -> JudgeResult {
        let mut result = JudgeResult::default();
        match self.run_inner(input, &mut result).await {
            Ok(()) => {
                result.passed = result.passed_tests_count == result.tests_count;
                info!(
                    passed = result.passed,
                    passed_tests = result.passed_tests_count,
                    tests = result.tests_count,
                    "judge run finished"
                );
            }
            Err(error) => {
                info!(error = %error, "judge run aborted");
                result.passed = false;
                result.error = Some(error);
            }
        }
        result
    }

    async fn run_inner(&self, input: &JudgeInput, result: &mut JudgeResult) -> Result<()> {
        result.tests = discover_tests(&input.test_dir)?;
        result.tests_count = result.tests.len();

        let sources = collect_sources(&input.sources)?;
        info!(
            tests = result.tests_count,
            sources = sources.len(),
            "starting judge run"
        );

        for index in 0..result.tests.len() {
            let test = &mut result.tests[index];
            let passed = Self::run_test(
                &self.toolchain,
                &self.trace_source,
                &input.test_dir,
                &sources,
                test,
            )
            .await?;
            if passed {
                result.passed_tests_count += 1;
            }
        }
        Ok(())
    }

    /// Compile, simulate, and check one test. The simulation's work
    /// directory (executable + trace) is removed when `sim` drops, even on
    /// a failed test.
    async fn run_test(
        toolchain: &T,
        trace_source: &S,
        test_dir: &Path,
        sources: &[PathBuf],
        test: &mut Test,
    ) -> Result<bool> {
        let bench = test_dir.join(format!("{}-test.v", test.name));
        info!(test = %test.name, "compiling and simulating");

        let sim = toolchain.compile(&bench, sources).await?;
        let trace_path = toolchain.simulate(&sim).await?;
        let trace = trace_source.open(&trace_path)?;

        test.passed_assertions_count = check_assertions(test, &trace);
        test.passed = test.passed_assertions_count == test.assertions_count();
        info!(
            test = %test.name,
            passed = test.passed,
            passed_assertions = test.passed_assertions_count,
            assertions = test.assertions_count(),
            "test finished"
        );
        Ok(test.passed)
    }
}

/// Run the judge with the default Icarus Verilog toolchain.
pub async fn run_judge(input: &JudgeInput, config: ToolchainConfig) -> JudgeResult {
    Judge::with_config(config).run(input).await
}
