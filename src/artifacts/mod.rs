//! Bisection data structures and algorithms
//!
//! - `benchmark`: running the benchmark command and reading its duration
//! - `bisect`: the binary-search engine and its result types
//! - `core`: shared output plumbing (pager wrapper)
//! - `objects`: commit identifiers as reported by git
//! - `report`: terminal reports, ASCII graph and saved results

pub mod benchmark;
pub mod bisect;
pub mod core;
pub mod objects;
pub mod report;
