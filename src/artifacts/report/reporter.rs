use crate::artifacts::report::graph::GraphGenerator;
use crate::artifacts::report::{
    MeasurementRecord, ReportError, ResultRecord, format_duration, truncate,
};
use crate::artifacts::objects::SHORT_OBJECT_ID_LENGTH;
use colored::Colorize;
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

const MESSAGE_WIDTH: usize = 50;
const COLUMN_GAP: &str = "  ";
const CSV_HEADER: [&str; 4] = ["Commit", "Duration", "Passed", "Message"];

/// On-disk encoding of a saved report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFileFormat {
    Json,
    Csv,
}

/// Prints and persists bisection reports
///
/// Reports are only ever written below `allowed_base`; every save resolves
/// the requested path and checks it before touching the file system.
pub struct Reporter {
    allowed_base: PathBuf,
    writer: RefCell<Box<dyn Write>>,
}

impl Reporter {
    pub fn new(allowed_base: &Path, writer: Box<dyn Write>) -> Result<Self, ReportError> {
        Ok(Self {
            allowed_base: allowed_base.canonicalize()?,
            writer: RefCell::new(writer),
        })
    }

    pub fn allowed_base(&self) -> &Path {
        &self.allowed_base
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn print_summary(&self, record: &ResultRecord) -> Result<(), ReportError> {
        if record.dry_run {
            return self.print_preview(record);
        }

        let mut w = self.writer();
        writeln!(w)?;
        writeln!(w, "{}", "=== Performance Bisect Results ===".bold())?;
        writeln!(w, "Good commit: {}", short_id(&record.good_commit))?;
        writeln!(w, "Bad commit:  {}", short_id(&record.bad_commit))?;
        if let Some(threshold) = record.threshold {
            writeln!(w, "Threshold:   {threshold}s")?;
        }
        writeln!(w)?;

        match &record.regression_commit {
            Some(commit) => {
                let headline = format!("Regression found at: {}", short_id(commit));
                writeln!(w, "{}", headline.red().bold())?;
                writeln!(
                    w,
                    "Message: {}",
                    record.regression_message.as_deref().unwrap_or_default()
                )?;
            }
            None => writeln!(w, "{}", "No regression found".green().bold())?,
        }

        writeln!(w)?;
        writeln!(w, "Tested {} commits", record.measurements.len())?;
        writeln!(w)?;
        write_table(&mut *w, &record.measurements)?;

        Ok(())
    }

    fn print_preview(&self, record: &ResultRecord) -> Result<(), ReportError> {
        let mut w = self.writer();
        writeln!(w)?;
        writeln!(w, "{}", "=== DRY RUN ===".bold())?;
        writeln!(w, "Would test {} commits", record.measurements.len())?;
        writeln!(
            w,
            "Range: {}..{}",
            short_id(&record.good_commit),
            short_id(&record.bad_commit)
        )?;
        for m in &record.measurements {
            writeln!(
                w,
                "  {} {}",
                short_id(&m.commit).yellow(),
                truncate(&m.message, MESSAGE_WIDTH)
            )?;
        }

        Ok(())
    }

    pub fn print_graph(
        &self,
        record: &ResultRecord,
        generator: &GraphGenerator,
    ) -> Result<(), ReportError> {
        writeln!(self.writer(), "{}", generator.generate(&record.measurements))?;
        Ok(())
    }

    /// Check where `output` would be written and in which format
    ///
    /// The extension picks the format; the resolved path must lie below the
    /// allowed base. Nothing is created on disk.
    pub fn validate_output(&self, output: &Path) -> Result<(PathBuf, ReportFileFormat), ReportError> {
        let extension = output
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let format = match extension.as_str() {
            "json" => ReportFileFormat::Json,
            "csv" => ReportFileFormat::Csv,
            _ => return Err(ReportError::UnsupportedFormat(extension)),
        };

        Ok((self.validate_path(output)?, format))
    }

    /// Save `record` as JSON or CSV, chosen by the extension of `output`
    ///
    /// Returns the resolved path that was written.
    pub fn save_report(&self, record: &ResultRecord, output: &Path) -> Result<PathBuf, ReportError> {
        let (path, format) = self.validate_output(output)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match format {
            ReportFileFormat::Json => {
                let mut writer = BufWriter::new(File::create(&path)?);
                serde_json::to_writer_pretty(&mut writer, record)?;
                writeln!(writer)?;
                writer.flush()?;
            }
            ReportFileFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                writer.write_record(CSV_HEADER)?;
                for m in &record.measurements {
                    writer.write_record([
                        m.commit.clone(),
                        m.duration.map(|d| d.to_string()).unwrap_or_default(),
                        m.passed.map(|p| p.to_string()).unwrap_or_default(),
                        m.message.clone(),
                    ])?;
                }
                writer.flush()?;
            }
        }

        log::info!("Saved report to {}", path.display());
        Ok(path)
    }

    /// Load a JSON report written by [`Reporter::save_report`]
    ///
    /// Fails with [`ReportError::InvalidSchema`] when required fields are
    /// missing or have the wrong type.
    pub fn load(&self, path: &Path) -> Result<ResultRecord, ReportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn validate_path(&self, path: &Path) -> Result<PathBuf, ReportError> {
        let resolved = self.resolve(path);

        if !resolved.starts_with(&self.allowed_base) {
            return Err(ReportError::OutsideAllowedDirectory {
                path: resolved,
                base: self.allowed_base.clone(),
            });
        }

        Ok(resolved)
    }

    /// Absolute, `..`-free form of `path`, with symlinks resolved in the part that exists
    fn resolve(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.allowed_base.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                other => normalized.push(other),
            }
        }

        let mut existing = normalized.as_path();
        let mut missing = Vec::new();
        while !existing.exists() {
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name);
                    existing = parent;
                }
                _ => break,
            }
        }

        let mut resolved = existing
            .canonicalize()
            .unwrap_or_else(|_| existing.to_path_buf());
        resolved.extend(missing.iter().rev());
        resolved
    }
}

fn short_id(id: &str) -> String {
    truncate(id, SHORT_OBJECT_ID_LENGTH)
}

fn write_table(w: &mut dyn Write, measurements: &[MeasurementRecord]) -> std::io::Result<()> {
    let rows = measurements
        .iter()
        .map(|m| {
            [
                short_id(&m.commit),
                format_duration(m.duration),
                match m.passed {
                    Some(true) => "pass".to_string(),
                    Some(false) => "FAIL".to_string(),
                    None => "-".to_string(),
                },
                truncate(&m.message, MESSAGE_WIDTH),
            ]
        })
        .collect::<Vec<_>>();

    let headers = ["Commit", "Duration", "Status", "Message"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let [commit_w, duration_w, status_w, _] = widths;
    writeln!(
        w,
        "{:<commit_w$}{COLUMN_GAP}{:>duration_w$}{COLUMN_GAP}{:<status_w$}{COLUMN_GAP}{}",
        headers[0], headers[1], headers[2], headers[3]
    )?;
    writeln!(
        w,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
    )?;

    for [commit, duration, status, message] in rows {
        let padded_status = format!("{status:<status_w$}");
        let status = match status.as_str() {
            "pass" => padded_status.green(),
            "FAIL" => padded_status.red(),
            _ => padded_status.normal(),
        };
        writeln!(
            w,
            "{commit:<commit_w$}{COLUMN_GAP}{duration:>duration_w$}{COLUMN_GAP}{status}{COLUMN_GAP}{message}"
        )?;
    }

    Ok(())
}
