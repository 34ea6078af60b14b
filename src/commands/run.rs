use crate::areas::repository::Repository;
use crate::artifacts::benchmark::process::ProcessRunner;
use crate::artifacts::bisect::config::BisectConfig;
use crate::artifacts::bisect::{Bisector, RangeResolver};
use crate::artifacts::report::{ResultRecord, format_duration};
use crate::artifacts::report::reporter::Reporter;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub benchmark_cmd: String,
    pub good: String,
    pub bad: String,
    pub threshold: f64,
    pub timeout: u64,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

impl Repository {
    /// Bisect `good..bad` for the first commit whose benchmark exceeds the threshold
    ///
    /// Configuration and the output path are validated before the range is
    /// resolved, and the range is resolved before anything is checked out.
    pub fn run_bisect(
        &mut self,
        opts: &RunOptions,
        reporter: &Reporter,
        cancellation: Arc<AtomicBool>,
    ) -> anyhow::Result<()> {
        let config = BisectConfig::new(
            opts.benchmark_cmd.as_str(),
            opts.threshold,
            Duration::from_secs(opts.timeout),
        )?;

        let output = match &opts.output {
            Some(output) if !opts.dry_run => Some(
                reporter
                    .validate_output(output)
                    .with_context(|| format!("cannot save results to {}", output.display()))?
                    .0,
            ),
            _ => None,
        };

        let range = self.resolve_range(&opts.good, &opts.bad)?;
        log::info!(
            "Bisecting {} commits between {} and {}",
            range.len(),
            range.good().to_short_oid(),
            range.bad().to_short_oid()
        );

        if opts.dry_run {
            let preview = Bisector::preview(&range);
            reporter.print_summary(&ResultRecord::from(&preview))?;
            return Ok(());
        }

        let mut runner = ProcessRunner::new().with_working_dir(self.path());
        let result = Bisector::new(&mut *self, &mut runner)
            .with_cancellation(cancellation)
            .bisect(&range, &config);

        let result = match result {
            Ok(result) => result,
            Err(failure) => {
                for m in failure.measurements() {
                    log::warn!(
                        "Measured before abort: {} {}",
                        m.commit().to_short_oid(),
                        format_duration(m.duration())
                    );
                }
                return Err(failure.into());
            }
        };

        let record = ResultRecord::from(&result);
        reporter.print_summary(&record)?;

        if let Some(output) = output {
            let written = reporter.save_report(&record, &output)?;
            writeln!(reporter.writer(), "\nResults saved to: {}", written.display())?;
        }

        Ok(())
    }
}
