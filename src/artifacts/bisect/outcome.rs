use crate::artifacts::bisect::measurement::Measurement;
use crate::artifacts::objects::commit_ref::CommitRef;

/// The commits between a known-good and a known-bad revision
///
/// `commits` is oldest first, excludes `good` and ends with `bad`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRange {
    good: CommitRef,
    bad: CommitRef,
    commits: Vec<CommitRef>,
}

impl CommitRange {
    pub fn new(good: CommitRef, bad: CommitRef, commits: Vec<CommitRef>) -> Self {
        Self { good, bad, commits }
    }

    pub fn good(&self) -> &CommitRef {
        &self.good
    }

    pub fn bad(&self) -> &CommitRef {
        &self.bad
    }

    pub fn commits(&self) -> &[CommitRef] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Final outcome of a bisection
///
/// `measurements` is in probe order. `regression_commit` is the binary-search
/// boundary; with a non-monotonic metric it is not necessarily the first
/// commit that exceeds the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct BisectResult {
    range_start: CommitRef,
    range_end: CommitRef,
    threshold: f64,
    regression_commit: Option<CommitRef>,
    measurements: Vec<Measurement>,
}

impl BisectResult {
    pub(crate) fn new(
        range: &CommitRange,
        threshold: f64,
        regression_commit: Option<CommitRef>,
        measurements: Vec<Measurement>,
    ) -> Self {
        Self {
            range_start: range.good().clone(),
            range_end: range.bad().clone(),
            threshold,
            regression_commit,
            measurements,
        }
    }

    pub fn range_start(&self) -> &CommitRef {
        &self.range_start
    }

    pub fn range_end(&self) -> &CommitRef {
        &self.range_end
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn regression_commit(&self) -> Option<&CommitRef> {
        self.regression_commit.as_ref()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }
}

/// What a bisection would probe, without running anything
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResult {
    range_start: CommitRef,
    range_end: CommitRef,
    measurements: Vec<Measurement>,
}

impl PreviewResult {
    pub(crate) fn new(range: &CommitRange) -> Self {
        Self {
            range_start: range.good().clone(),
            range_end: range.bad().clone(),
            measurements: range
                .commits()
                .iter()
                .cloned()
                .map(Measurement::placeholder)
                .collect(),
        }
    }

    pub fn range_start(&self) -> &CommitRef {
        &self.range_start
    }

    pub fn range_end(&self) -> &CommitRef {
        &self.range_end
    }

    /// One placeholder per commit in the range, oldest first
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }
}
