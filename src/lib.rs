//! Performance regression bisection
//!
//! `perf-bisect` walks a git revision range with binary search, running a
//! benchmark command at every probed commit and comparing the measured
//! duration against a threshold.
//!
//! - `areas`: the git repository the bisection operates on
//! - `artifacts`: the bisection engine, benchmark execution and reporting
//! - `commands`: the user-facing `run`, `report` and `graph` commands

pub mod areas;
pub mod artifacts;
pub mod commands;

/// Which sections of a saved report to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    Table,
    Graph,
    #[default]
    Both,
}

impl ReportFormat {
    pub fn shows_table(&self) -> bool {
        matches!(self, ReportFormat::Table | ReportFormat::Both)
    }

    pub fn shows_graph(&self) -> bool {
        matches!(self, ReportFormat::Graph | ReportFormat::Both)
    }
}
