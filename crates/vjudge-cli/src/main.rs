//! vjudge - command-line judge for Verilog exercises
//!
//! Points the judge core at a directory of `<name>-test.v` /
//! `<name>-assertion.txt` pairs and a candidate source set, then reports
//! per-test and per-assertion outcomes. Exit code 0 means the run passed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use vjudge_core::{run_judge, JudgeInput, JudgeResult, SourceSet, ToolchainConfig};

#[derive(Parser)]
#[command(name = "vjudge")]
#[command(version = vjudge_core::VERSION)]
#[command(about = "Automated judge for Verilog exercises", long_about = None)]
struct Cli {
    /// Directory containing <name>-test.v and <name>-assertion.txt pairs
    #[arg(short, long)]
    tests: PathBuf,

    /// Directory to scan for candidate source files
    #[arg(long, conflicts_with = "sources")]
    srcs_dir: Option<PathBuf>,

    /// Explicit candidate source files
    #[arg(required_unless_present = "srcs_dir")]
    sources: Vec<PathBuf>,

    /// Verilog compiler executable
    #[arg(long, default_value = "iverilog", env = "VJUDGE_COMPILER")]
    compiler: String,

    /// Timeout per compiler/simulation invocation, in seconds (0 = none)
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Emit the result as JSON instead of a human-readable report
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Wire up the global subscriber from the CLI flags. A `--json` run logs
/// newline-delimited JSON so stderr stays machine-readable alongside the
/// JSON report on stdout. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    match run(cli).await {
        Ok(passed) => {
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("vjudge: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    info!(version = vjudge_core::VERSION, tests = %cli.tests.display(), "starting judge");

    let sources = match cli.srcs_dir {
        Some(dir) => SourceSet::Directory(dir),
        None => SourceSet::Files(cli.sources),
    };
    let input = JudgeInput {
        test_dir: cli.tests,
        sources,
    };
    let config = ToolchainConfig {
        compiler: cli.compiler,
        timeout_secs: cli.timeout,
    };

    let result = run_judge(&input, config).await;

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&result).context("Failed to serialize judge result")?;
        println!("{rendered}");
    } else {
        print_report(&result);
    }

    Ok(result.passed)
}

fn print_report(result: &JudgeResult) {
    for test in &result.tests {
        let verdict = if test.passed { "PASS" } else { "FAIL" };
        println!(
            "{verdict} {} ({}/{} assertions)",
            test.name,
            test.passed_assertions_count,
            test.assertions_count()
        );
        for r in test.assertion_results.iter().filter(|r| !r.passed) {
            println!(
                "  at #{}: {} expected {:?}, got {:?}",
                r.assertion.timestamp,
                r.assertion.signal_name,
                r.assertion.expected_value,
                r.actual_value
            );
        }
    }

    println!("Passed: {}/{}", result.passed_tests_count, result.tests_count);
    if let Some(error) = &result.error {
        println!("Error: {error}");
    }
}
