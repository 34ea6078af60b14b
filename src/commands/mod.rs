//! User-facing commands
//!
//! - `run`: bisect a revision range (or preview it with `--dry-run`)
//! - `report`: display a saved results file as a table, a graph or both
//! - `graph`: draw the ASCII duration chart of a saved results file

pub mod graph;
pub mod report;
pub mod run;
