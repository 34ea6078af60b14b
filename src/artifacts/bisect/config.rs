use crate::artifacts::bisect::error::BisectError;
use std::time::Duration;

/// Default per-probe benchmark timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Longest accepted per-probe timeout: one week
pub const MAX_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Validated parameters of one bisection run
#[derive(Debug, Clone, PartialEq)]
pub struct BisectConfig {
    command: String,
    threshold: f64,
    timeout: Duration,
}

impl BisectConfig {
    /// Validate the run parameters before anything touches the repository
    ///
    /// The threshold is in seconds and must be a finite, non-negative number;
    /// the timeout must be positive and at most [`MAX_TIMEOUT_SECS`].
    pub fn new(
        command: impl Into<String>,
        threshold: f64,
        timeout: Duration,
    ) -> Result<Self, BisectError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(BisectError::InvalidConfiguration(format!(
                "threshold must be a non-negative number of seconds, got {threshold}"
            )));
        }
        if timeout.is_zero() {
            return Err(BisectError::InvalidConfiguration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if timeout > Duration::from_secs(MAX_TIMEOUT_SECS) {
            return Err(BisectError::InvalidConfiguration(format!(
                "timeout must be at most {MAX_TIMEOUT_SECS} seconds, got {}",
                timeout.as_secs()
            )));
        }

        Ok(Self {
            command: command.into(),
            threshold,
            timeout,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
