use crate::ReportFormat;
use crate::artifacts::report::graph::GraphGenerator;
use crate::artifacts::report::reporter::Reporter;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Reporter {
    /// Print a saved results file
    ///
    /// The graph section is skipped for dry-run files, which carry no durations.
    pub fn show_report(&self, results_file: &Path, format: ReportFormat) -> anyhow::Result<()> {
        let record = self.load(results_file)?;

        if format.shows_table() {
            self.print_summary(&record)?;
        }

        if format.shows_graph() && !record.dry_run {
            writeln!(self.writer())?;
            writeln!(self.writer(), "{}", "=== Performance Graph ===".bold())?;
            self.print_graph(&record, &GraphGenerator::default())?;
        }

        Ok(())
    }
}
