//! Benchmark execution
//!
//! - `duration`: turns raw benchmark output into a number of seconds
//! - `process`: runs the benchmark as a child process with a timeout
//!
//! The bisection engine only sees the [`BenchmarkRunner`] trait, so a probe can
//! be backed by a local process, a container exec or a scripted double in tests.

pub mod duration;
pub mod process;

use crate::artifacts::benchmark::duration::ParseError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single benchmark invocation
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("empty benchmark command")]
    EmptyCommand,

    #[error("malformed benchmark command (unbalanced quotes or trailing escape): {0}")]
    MalformedCommand(String),

    #[error("benchmark command not found: {program}")]
    CommandNotFound { program: String },

    #[error("benchmark failed{}: {stderr}", exit_code_suffix(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("benchmark timed out after {}s", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to execute benchmark: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

/// Runs a benchmark command and reports how long it took, in seconds
pub trait BenchmarkRunner {
    fn run(&mut self, command: &str, timeout: Duration) -> Result<f64, RunnerError>;
}
