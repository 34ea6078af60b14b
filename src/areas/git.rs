//! Thin wrapper around the `git` executable
//!
//! History traversal and checkout are delegated to git itself. Every call
//! runs `git -C <repository> ...` with stdin closed and captures both output
//! streams.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`{command}` failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected git output: {0}")]
    UnexpectedOutput(String),
}

#[derive(Debug, Clone)]
pub struct Git {
    work_tree: PathBuf,
}

impl Git {
    pub fn new(work_tree: &Path) -> Self {
        Self {
            work_tree: work_tree.to_path_buf(),
        }
    }

    /// Run a git subcommand and return its standard output
    pub fn run(&self, args: &[&str]) -> Result<String, GitError> {
        log::trace!("git {}", args.join(" "));

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.work_tree)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
