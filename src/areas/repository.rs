use crate::areas::git::{Git, GitError};
use crate::artifacts::bisect::error::BisectError;
use crate::artifacts::bisect::outcome::CommitRange;
use crate::artifacts::bisect::{Checkout, RangeResolver};
use crate::artifacts::objects::commit_ref::CommitRef;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;

const COMMIT_LINE_FORMAT: &str = "--format=%H%x09%s";

/// The git working tree being bisected
pub struct Repository {
    path: Box<Path>,
    git: Git,
}

impl Repository {
    pub fn new(path: &str) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let git = Git::new(&path);

        Ok(Repository {
            path: path.into_boxed_path(),
            git,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a revision (branch, tag, `HEAD~3`, abbreviated hash) to a commit
    pub fn resolve_commit(&self, reference: &str) -> Result<CommitRef, BisectError> {
        if reference.is_empty() || reference.starts_with('-') {
            return Err(BisectError::InvalidConfiguration(format!(
                "invalid revision '{reference}'"
            )));
        }

        let resolution_failure = |source| BisectError::RangeResolution {
            reference: reference.to_string(),
            source,
        };

        let spec = format!("{reference}^{{commit}}");
        let oid = self
            .git
            .run(&["rev-parse", "--verify", &spec])
            .and_then(|stdout| parse_oid(stdout.trim()))
            .map_err(resolution_failure)?;

        let summary = self
            .git
            .run(&["show", "--no-patch", "--no-color", "--format=%s", oid.as_ref()])
            .map_err(resolution_failure)?;

        Ok(CommitRef::new(oid, summary.trim_end().to_string()))
    }

    /// Commits reachable from `bad` but not from `good`, oldest first
    fn commits_between(&self, good: &ObjectId, bad: &ObjectId) -> Result<Vec<CommitRef>, GitError> {
        let range = format!("{good}..{bad}");
        let stdout = self.git.run(&[
            "log",
            "--reverse",
            "--no-color",
            "--no-decorate",
            COMMIT_LINE_FORMAT,
            &range,
        ])?;

        stdout.lines().map(parse_commit_line).collect()
    }
}

fn parse_oid(s: &str) -> Result<ObjectId, GitError> {
    ObjectId::try_parse(s).map_err(|e| GitError::UnexpectedOutput(format!("{e}: {s}")))
}

fn parse_commit_line(line: &str) -> Result<CommitRef, GitError> {
    let (hash, summary) = line.split_once('\t').unwrap_or((line, ""));
    Ok(CommitRef::new(parse_oid(hash)?, summary.to_string()))
}

impl RangeResolver for Repository {
    fn resolve_range(&self, good: &str, bad: &str) -> Result<CommitRange, BisectError> {
        let good = self.resolve_commit(good)?;
        let bad = self.resolve_commit(bad)?;

        let commits = self
            .commits_between(good.oid(), bad.oid())
            .map_err(|source| BisectError::RangeResolution {
                reference: format!("{}..{}", good.to_short_oid(), bad.to_short_oid()),
                source,
            })?;

        Ok(CommitRange::new(good, bad, commits))
    }
}

impl Checkout for Repository {
    fn checkout(&mut self, commit: &CommitRef) -> Result<(), BisectError> {
        log::debug!("Checking out {}", commit.to_short_oid());
        self.git
            .run(&["checkout", "--force", "--quiet", commit.oid().as_ref()])
            .map(|_| ())
            .map_err(|source| BisectError::CheckoutFailure {
                commit: commit.to_short_oid(),
                source,
            })
    }

    fn restore(&mut self, commit: &CommitRef) -> Result<(), BisectError> {
        log::debug!("Restoring working tree to {}", commit.to_short_oid());
        self.git
            .run(&["checkout", "--quiet", commit.oid().as_ref()])
            .map(|_| ())
            .map_err(|source| BisectError::CheckoutFailure {
                commit: commit.to_short_oid(),
                source,
            })
    }
}
