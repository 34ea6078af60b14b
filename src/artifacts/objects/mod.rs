//! Commit identity as reported by git
//!
//! - `object_id`: validated hexadecimal commit hashes
//! - `commit_ref`: a commit hash paired with its one-line summary

pub mod commit_ref;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-256 hash in hexadecimal format (repositories using `objectFormat = sha256`)
pub const SHA256_OBJECT_ID_LENGTH: usize = 64;

/// Number of characters shown for abbreviated object IDs
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
