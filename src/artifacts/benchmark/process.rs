//! Benchmark execution as a child process
//!
//! The command string is split with POSIX shell quoting rules and the
//! resulting argument vector is executed directly. No shell ever sees the
//! string, so `;`, `&&`, `$(...)` and globs reach the program as literal
//! arguments.

use crate::artifacts::benchmark::duration;
use crate::artifacts::benchmark::{BenchmarkRunner, RunnerError};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// [`BenchmarkRunner`] that spawns the benchmark as a local process
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
    poll_interval: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            working_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run benchmarks from `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Split a command line into an argument vector
    pub fn tokenize(command: &str) -> Result<Vec<String>, RunnerError> {
        let args = shlex::split(command)
            .ok_or_else(|| RunnerError::MalformedCommand(command.to_string()))?;

        if args.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }

        Ok(args)
    }

    fn spawn(&self, args: &[String]) -> Result<Child, RunnerError> {
        let (program, rest) = args.split_first().ok_or(RunnerError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => RunnerError::CommandNotFound {
                program: program.clone(),
            },
            _ => RunnerError::Io(e),
        })
    }

    /// Wait for the child until `deadline`, killing it if the deadline passes
    ///
    /// Returns `None` on timeout, after the child has been killed and reaped.
    /// Without a deadline the child is waited for indefinitely.
    fn wait_until(
        &self,
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> Result<Option<ExitStatus>, RunnerError> {
        let Some(deadline) = deadline else {
            return Ok(Some(child.wait()?));
        };

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }

            let now = Instant::now();
            if now >= deadline {
                // the child may have exited between try_wait and kill
                let _ = child.kill();
                child.wait()?;
                return Ok(None);
            }

            std::thread::sleep(self.poll_interval.min(deadline - now));
        }
    }
}

impl BenchmarkRunner for ProcessRunner {
    fn run(&mut self, command: &str, timeout: Duration) -> Result<f64, RunnerError> {
        let args = Self::tokenize(command)?;
        log::debug!("Executing benchmark: {:?}", args);

        let started = Instant::now();
        let mut child = self.spawn(&args)?;

        // Pipes are drained concurrently so a chatty benchmark never blocks on a full buffer
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // A timeout too large to represent is no deadline at all
        let deadline = started.checked_add(timeout);
        let Some(status) = self.wait_until(&mut child, deadline)? else {
            // Grandchildren may still hold the pipes open; the drain threads are left detached
            return Err(RunnerError::Timeout { timeout });
        };

        // A background process started by the benchmark can keep the pipes open after it exits
        let (Some(stdout), Some(stderr)) = (collect(&stdout, deadline), collect(&stderr, deadline))
        else {
            return Err(RunnerError::Timeout { timeout });
        };
        log::debug!(
            "Benchmark exited with {} after {:.3}s",
            status,
            started.elapsed().as_secs_f64()
        );

        if !status.success() {
            return Err(RunnerError::NonZeroExit {
                code: status.code(),
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(duration::extract(&stdout)?)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        let _ = tx.send(String::from_utf8_lossy(&buffer).into_owned());
    });
    rx
}

/// Output of a drain thread, or `None` if it is still reading at `deadline`
fn collect(rx: &Receiver<String>, deadline: Option<Instant>) -> Option<String> {
    let received = match deadline {
        Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match received {
        Ok(output) => Some(output),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}
