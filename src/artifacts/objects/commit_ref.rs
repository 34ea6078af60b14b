use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// A commit as the range resolver reported it: its hash and the first line of its message
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct CommitRef {
    oid: ObjectId,
    summary: String,
}

impl CommitRef {
    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn to_short_oid(&self) -> String {
        self.oid.to_short_oid()
    }
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.oid.to_short_oid(), self.summary)
    }
}
