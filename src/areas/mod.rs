//! The repository a bisection runs against
//!
//! - `git`: invocation of the `git` executable
//! - `repository`: range resolution and checkout on a git working tree

pub mod git;
pub mod repository;
