use crate::artifacts::objects::commit_ref::CommitRef;

/// Outcome of probing one commit
///
/// Placeholders (dry run) carry neither a duration nor a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    commit: CommitRef,
    duration: Option<f64>,
    passed: Option<bool>,
}

impl Measurement {
    /// A probe result; it passes when `duration <= threshold`
    pub fn probed(commit: CommitRef, duration: f64, threshold: f64) -> Self {
        Self {
            commit,
            duration: Some(duration),
            passed: Some(duration <= threshold),
        }
    }

    pub fn placeholder(commit: CommitRef) -> Self {
        Self {
            commit,
            duration: None,
            passed: None,
        }
    }

    pub fn commit(&self) -> &CommitRef {
        &self.commit
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn passed(&self) -> Option<bool> {
        self.passed
    }
}
