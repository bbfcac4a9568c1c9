//! External toolchain invocation: compile a bench against the candidate
//! sources, then run the produced simulation to obtain a VCD trace.
//!
//! Both steps are structured process invocations (argument vectors, never a
//! shell string), bounded by a configurable timeout. Any toolchain failure,
//! compile or simulate, maps to [`JudgeError::CompilingVerilogFile`].

use crate::error::{JudgeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

/// Name of the compiled simulation inside its work directory.
const OUT_FILE_NAME: &str = ".tmp.out";

/// Name of the trace the bench is expected to dump, via
/// `$dumpfile(".tmp.vcd")`, relative to the simulation's working directory.
const VCD_FILE_NAME: &str = ".tmp.vcd";

/// Toolchain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Compiler executable (resolved via PATH).
    pub compiler: String,

    /// Timeout per external invocation, in seconds. 0 disables the bound.
    pub timeout_secs: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            compiler: "iverilog".to_string(),
            timeout_secs: 60,
        }
    }
}

/// A compiled simulation scoped to its private work directory.
///
/// Dropping the value removes the directory and both temporary artifacts,
/// whether or not the test passed.
#[derive(Debug)]
pub struct Simulation {
    work_dir: TempDir,
    artifact: PathBuf,
}

impl Simulation {
    /// Create a simulation rooted in a fresh private work directory.
    pub fn prepare(bench: &Path) -> Result<Self> {
        let work_dir = tempfile::tempdir().map_err(|e| JudgeError::CompilingVerilogFile {
            bench: bench.display().to_string(),
            detail: format!("creating work directory: {e}"),
        })?;
        let artifact = work_dir.path().join(OUT_FILE_NAME);
        Ok(Simulation { work_dir, artifact })
    }

    /// Path of the compiled simulation executable.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// The private directory the simulation runs in.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Where the simulation is expected to dump its trace.
    pub fn trace_path(&self) -> PathBuf {
        self.work_dir.path().join(VCD_FILE_NAME)
    }
}

/// Compile-and-simulate seam between the orchestrator and the external
/// toolchain. Implementations must be side-effect-complete: after
/// `simulate` returns, the trace file exists (or opening it fails the run).
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Build a runnable simulation from a bench and the candidate sources.
    async fn compile(&self, bench: &Path, sources: &[PathBuf]) -> Result<Simulation>;

    /// Run the simulation; returns the path of the dumped trace.
    async fn simulate(&self, sim: &Simulation) -> Result<PathBuf>;
}

/// Icarus Verilog toolchain (`iverilog` + direct execution of its output).
#[derive(Debug, Clone, Default)]
pub struct IcarusToolchain {
    config: ToolchainConfig,
}

impl IcarusToolchain {
    pub fn new(config: ToolchainConfig) -> Self {
        IcarusToolchain { config }
    }

    /// Spawn and await one bounded external process.
    async fn run_command(&self, mut cmd: Command, bench: &Path) -> Result<std::process::Output> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let to_error = |detail: String| JudgeError::CompilingVerilogFile {
            bench: bench.display().to_string(),
            detail,
        };

        let child = cmd.spawn().map_err(|e| to_error(e.to_string()))?;
        let waited = if self.config.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(self.config.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| {
                to_error(format!(
                    "timed out after {} seconds",
                    self.config.timeout_secs
                ))
            })?
        } else {
            child.wait_with_output().await
        };
        let output = waited.map_err(|e| to_error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(to_error(format!(
                "exit status {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(output)
    }
}

#[async_trait]
impl Toolchain for IcarusToolchain {
    async fn compile(&self, bench: &Path, sources: &[PathBuf]) -> Result<Simulation> {
        let sim = Simulation::prepare(bench)?;

        let mut cmd = Command::new(&self.config.compiler);
        cmd.arg(bench);
        cmd.args(sources);
        cmd.arg("-o").arg(sim.artifact());

        debug!(bench = %bench.display(), sources = sources.len(), "compiling");
        self.run_command(cmd, bench).await?;
        Ok(sim)
    }

    async fn simulate(&self, sim: &Simulation) -> Result<PathBuf> {
        // The bench dumps its trace relative to the working directory;
        // stdout is discarded.
        let mut cmd = Command::new(sim.artifact());
        cmd.current_dir(sim.work_dir());

        debug!(artifact = %sim.artifact().display(), "running simulation");
        self.run_command(cmd, sim.artifact()).await?;
        Ok(sim.trace_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolchainConfig::default();
        assert_eq!(config.compiler, "iverilog");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_simulation_paths_share_work_dir() {
        let sim = Simulation::prepare(Path::new("adder-test.v")).unwrap();
        assert_eq!(sim.artifact().parent(), Some(sim.work_dir()));
        assert_eq!(sim.trace_path().parent(), Some(sim.work_dir()));
    }

    #[test]
    fn test_simulation_drop_removes_work_dir() {
        let sim = Simulation::prepare(Path::new("adder-test.v")).unwrap();
        let dir = sim.work_dir().to_path_buf();
        std::fs::write(sim.trace_path(), "leftover").unwrap();
        drop(sim);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_missing_compiler_is_compile_error() {
        let toolchain = IcarusToolchain::new(ToolchainConfig {
            compiler: "/nonexistent-compiler-binary".to_string(),
            timeout_secs: 5,
        });
        let err = toolchain
            .compile(Path::new("adder-test.v"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::CompilingVerilogFile { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_invocation_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let slow = dir.path().join("slowcc");
        std::fs::write(&slow, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&slow, std::fs::Permissions::from_mode(0o755)).unwrap();

        let toolchain = IcarusToolchain::new(ToolchainConfig {
            compiler: slow.display().to_string(),
            timeout_secs: 1,
        });
        let err = toolchain
            .compile(Path::new("adder-test.v"), &[])
            .await
            .unwrap_err();
        match err {
            JudgeError::CompilingVerilogFile { detail, .. } => {
                assert!(detail.contains("timed out"), "got: {detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_timeout_runs_unbounded() {
        let toolchain = IcarusToolchain::new(ToolchainConfig {
            compiler: "true".to_string(),
            timeout_secs: 0,
        });
        let sim = toolchain.compile(Path::new("adder-test.v"), &[]).await;
        assert!(sim.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_compiler_reports_exit_status() {
        let toolchain = IcarusToolchain::new(ToolchainConfig {
            compiler: "false".to_string(),
            timeout_secs: 5,
        });
        let err = toolchain
            .compile(Path::new("adder-test.v"), &[])
            .await
            .unwrap_err();
        match err {
            JudgeError::CompilingVerilogFile { detail, .. } => {
                assert!(detail.contains("exit status"), "got: {detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
