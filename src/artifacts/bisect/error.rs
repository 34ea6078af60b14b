use crate::areas::git::GitError;
use crate::artifacts::benchmark::RunnerError;
use crate::artifacts::bisect::measurement::Measurement;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BisectError {
    #[error(transparent)]
    Benchmark(#[from] RunnerError),

    #[error("failed to check out {commit}")]
    CheckoutFailure {
        commit: String,
        #[source]
        source: GitError,
    },

    #[error("could not resolve revision '{reference}'")]
    RangeResolution {
        reference: String,
        #[source]
        source: GitError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("bisection cancelled")]
    Cancelled,
}

/// A bisection that stopped on a fatal error
///
/// The measurements gathered before the failure are kept for diagnostics; they
/// are never turned into a result.
#[derive(Debug, Error)]
#[error("bisection aborted after {} probe(s)", .measurements.len())]
pub struct BisectFailure {
    #[source]
    error: BisectError,
    measurements: Vec<Measurement>,
}

impl BisectFailure {
    pub(crate) fn new(error: BisectError, measurements: Vec<Measurement>) -> Self {
        Self {
            error,
            measurements,
        }
    }

    pub fn error(&self) -> &BisectError {
        &self.error
    }

    /// Probes completed before the failure, in probe order
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn into_error(self) -> BisectError {
        self.error
    }
}
