//! Duration extraction from benchmark output
//!
//! Benchmark tools print their timings in many shapes. Extraction runs an
//! ordered list of strategies over the captured standard output and the first
//! one that recovers a number wins:
//!
//! 1. a JSON object with a numeric `duration` (or, failing that, `time`) field
//! 2. free text, scanned with [`TEXT_PATTERNS`] in order
//!
//! Output that none of them understands is a [`ParseError`].

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Number of output characters kept in a [`ParseError`]
pub const OUTPUT_PREVIEW_LENGTH: usize = 100;

/// Free-text duration patterns, most specific first
///
/// The first capture group of each pattern holds the number.
pub const TEXT_PATTERNS: [&str; 4] = [
    r"(?i)duration[:\s]+([0-9.]+)",
    r"(?i)time[:\s]+([0-9.]+)",
    r"(?i)([0-9.]+)\s*s(?:ec)?",
    r"(?m)^([0-9.]+)$",
];

const JSON_FIELDS: [&str; 2] = ["duration", "time"];

/// [`TEXT_PATTERNS`], compiled once and kept in order
static TEXT_REGEXES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    TEXT_PATTERNS.map(|pattern| Regex::new(pattern).expect("duration pattern must compile"))
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse duration from output: {preview}")]
pub struct ParseError {
    preview: String,
}

impl ParseError {
    fn from_output(output: &str) -> Self {
        Self {
            preview: output.chars().take(OUTPUT_PREVIEW_LENGTH).collect(),
        }
    }

    /// The leading part of the output that could not be parsed
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

/// One way of reading a duration out of raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Json,
    Text,
}

impl ExtractionStrategy {
    pub const ORDER: [ExtractionStrategy; 2] = [ExtractionStrategy::Json, ExtractionStrategy::Text];

    pub fn apply(&self, output: &str) -> Option<f64> {
        match self {
            ExtractionStrategy::Json => from_json(output),
            ExtractionStrategy::Text => from_text(output),
        }
    }
}

/// Extract a duration from raw benchmark output
pub fn extract(output: &str) -> Result<f64, ParseError> {
    ExtractionStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(output))
        .ok_or_else(|| ParseError::from_output(output))
}

fn from_json(output: &str) -> Option<f64> {
    let value: serde_json::Value = serde_json::from_str(output.trim()).ok()?;
    let object = value.as_object()?;
    // `time` is only consulted when there is no `duration` field at all
    let field = JSON_FIELDS.iter().find_map(|name| object.get(*name))?;

    field
        .as_f64()
        .or_else(|| field.as_str().and_then(|s| parse_number(s.trim())))
}

fn from_text(output: &str) -> Option<f64> {
    TEXT_REGEXES.iter().find_map(|re| {
        let caps = re.captures(output)?;
        parse_number(caps.get(1)?.as_str())
    })
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
