//! Performance bisection engine
//!
//! Binary search over a chronologically ordered commit range. Each probe checks
//! out the middle commit of the remaining window, runs the benchmark and
//! compares its duration with the threshold:
//!
//! - at or below the threshold, the regression lies strictly after the probe
//! - above it, the probe is the current regression candidate and the search
//!   continues in older history
//!
//! Probes are strictly sequential and any probe failure aborts the whole run:
//! a single bad measurement would steer every later decision. The metric is
//! assumed to be monotonic in history and that assumption is never checked.

pub mod config;
pub mod error;
pub mod measurement;
pub mod outcome;

use crate::artifacts::benchmark::BenchmarkRunner;
use crate::artifacts::bisect::config::BisectConfig;
use crate::artifacts::bisect::error::{BisectError, BisectFailure};
use crate::artifacts::bisect::measurement::Measurement;
use crate::artifacts::bisect::outcome::{BisectResult, CommitRange, PreviewResult};
use crate::artifacts::objects::commit_ref::CommitRef;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Resolves two revisions into the commits between them, oldest first
pub trait RangeResolver {
    fn resolve_range(&self, good: &str, bad: &str) -> Result<CommitRange, BisectError>;
}

/// Makes the working tree match a commit before it is benchmarked
pub trait Checkout {
    fn checkout(&mut self, commit: &CommitRef) -> Result<(), BisectError>;

    /// Return the tree to `commit` once the search is over
    fn restore(&mut self, commit: &CommitRef) -> Result<(), BisectError> {
        self.checkout(commit)
    }
}

pub struct Bisector<'a> {
    checkout: &'a mut dyn Checkout,
    runner: &'a mut dyn BenchmarkRunner,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<'a> Bisector<'a> {
    pub fn new(checkout: &'a mut dyn Checkout, runner: &'a mut dyn BenchmarkRunner) -> Self {
        Self {
            checkout,
            runner,
            cancellation: None,
        }
    }

    /// Stop before the next probe once `flag` is set
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// List the commits a bisection would consider, without probing any
    pub fn preview(range: &CommitRange) -> PreviewResult {
        PreviewResult::new(range)
    }

    /// Search `range` for the first commit whose benchmark exceeds the threshold
    ///
    /// Whatever the outcome, the working tree is restored to the `bad` end of
    /// the range afterwards. A failed restore is logged and does not change
    /// the result.
    pub fn bisect(
        &mut self,
        range: &CommitRange,
        config: &BisectConfig,
    ) -> Result<BisectResult, BisectFailure> {
        let mut measurements = Vec::new();
        let search = self.search(range, config, &mut measurements);

        if let Err(err) = self.checkout.restore(range.bad()) {
            log::warn!(
                "Could not restore {}: {:#}",
                range.bad().to_short_oid(),
                anyhow::Error::new(err)
            );
        }

        match search {
            Ok(regression_commit) => Ok(BisectResult::new(
                range,
                config.threshold(),
                regression_commit,
                measurements,
            )),
            Err(error) => Err(BisectFailure::new(error, measurements)),
        }
    }

    fn search(
        &mut self,
        range: &CommitRange,
        config: &BisectConfig,
        measurements: &mut Vec<Measurement>,
    ) -> Result<Option<CommitRef>, BisectError> {
        let commits = range.commits();
        // half-open window [low, high); the boundary, if any, lies inside it
        let (mut low, mut high) = (0, commits.len());
        let mut candidate = None;

        while low < high {
            if self.is_cancelled() {
                return Err(BisectError::Cancelled);
            }

            let mid = low + (high - low - 1) / 2;
            let commit = &commits[mid];
            log::info!("Testing commit {}", commit);

            self.checkout.checkout(commit)?;
            let duration = self.runner.run(config.command(), config.timeout())?;

            let measurement = Measurement::probed(commit.clone(), duration, config.threshold());
            let passed = measurement.passed().unwrap_or(false);
            log::info!(
                "{} took {:.3}s ({})",
                commit.to_short_oid(),
                duration,
                if passed { "pass" } else { "fail" }
            );
            measurements.push(measurement);

            if passed {
                low = mid + 1;
            } else {
                candidate = Some(commit.clone());
                high = mid;
            }
        }

        Ok(candidate)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
