//! Bisection reports
//!
//! A [`ResultRecord`] is the plain-value snapshot of a run that gets printed,
//! saved as JSON or CSV, and loaded back for later display.
//!
//! - `reporter`: terminal summary plus persistence inside an allowed directory
//! - `graph`: ASCII chart of the measured durations

pub mod graph;
pub mod reporter;

use crate::artifacts::bisect::measurement::Measurement;
use crate::artifacts::bisect::outcome::{BisectResult, PreviewResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("output path must be within {}", .base.display())]
    OutsideAllowedDirectory { path: PathBuf, base: PathBuf },

    #[error("unsupported report format: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(String),

    #[error("invalid results file schema: {0}")]
    InvalidSchema(serde_json::Error),

    #[error("malformed results file: {0}")]
    Json(serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            serde_json::error::Category::Data => ReportError::InvalidSchema(e),
            _ => ReportError::Json(e),
        }
    }
}

/// One probed commit as persisted in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub commit: String,
    pub message: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub passed: Option<bool>,
}

impl From<&Measurement> for MeasurementRecord {
    fn from(m: &Measurement) -> Self {
        Self {
            commit: m.commit().oid().to_string(),
            message: m.commit().summary().to_string(),
            duration: m.duration(),
            passed: m.passed(),
        }
    }
}

/// Persisted snapshot of a bisection or a dry-run preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub good_commit: String,
    pub bad_commit: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub regression_commit: Option<String>,
    #[serde(default)]
    pub regression_message: Option<String>,
    pub measurements: Vec<MeasurementRecord>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl From<&BisectResult> for ResultRecord {
    fn from(result: &BisectResult) -> Self {
        let regression = result.regression_commit();
        Self {
            good_commit: result.range_start().oid().to_string(),
            bad_commit: result.range_end().oid().to_string(),
            threshold: Some(result.threshold()),
            regression_commit: regression.map(|c| c.oid().to_string()),
            regression_message: regression.map(|c| c.summary().to_string()),
            measurements: result.measurements().iter().map(Into::into).collect(),
            dry_run: false,
        }
    }
}

impl From<&PreviewResult> for ResultRecord {
    fn from(preview: &PreviewResult) -> Self {
        Self {
            good_commit: preview.range_start().oid().to_string(),
            bad_commit: preview.range_end().oid().to_string(),
            threshold: None,
            regression_commit: None,
            regression_message: None,
            measurements: preview.measurements().iter().map(Into::into).collect(),
            dry_run: true,
        }
    }
}

/// A measured duration as reports print it, `-` for a placeholder
pub fn format_duration(duration: Option<f64>) -> String {
    duration.map_or_else(|| "-".to_string(), |d| format!("{d:.3}s"))
}

/// First `len` characters of an identifier or message, for display
pub(crate) fn truncate(s: &str, len: usize) -> String {
    s.chars().take(len).collect()
}
