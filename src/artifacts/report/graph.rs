//! ASCII duration chart
//!
//! Each column is one measurement (in trail order) and each row a duration
//! level, highest first. A cell is filled when the measurement reaches the
//! row's level: `█` for a passing probe, `▓` for a failing one.

use crate::artifacts::report::MeasurementRecord;
use derive_new::new;

pub const DEFAULT_HEIGHT: usize = 15;
pub const DEFAULT_WIDTH: usize = 60;

const PASS_CELL: char = '█';
const FAIL_CELL: char = '▓';
const TICK_EVERY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct GraphGenerator {
    height: usize,
    width: usize,
}

impl Default for GraphGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT, DEFAULT_WIDTH)
    }
}

impl GraphGenerator {
    pub fn generate(&self, measurements: &[MeasurementRecord]) -> String {
        let durations = measurements
            .iter()
            .filter_map(|m| m.duration)
            .collect::<Vec<_>>();
        if durations.is_empty() {
            return "No data to graph".to_string();
        }

        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            max = min + 1.0;
        }

        let columns = &measurements[..measurements.len().min(self.width)];
        let mut lines = Vec::with_capacity(self.height + 2);

        for row in (1..=self.height).rev() {
            let level = min + (max - min) * (row as f64 / self.height as f64);
            let cells = columns
                .iter()
                .map(|m| match m.duration {
                    Some(d) if d >= level => {
                        if m.passed == Some(true) {
                            PASS_CELL
                        } else {
                            FAIL_CELL
                        }
                    }
                    _ => ' ',
                })
                .collect::<String>();
            lines.push(format!("{level:6.2}s |{cells}"));
        }

        lines.push(format!("       {}", "-".repeat(columns.len())));
        let ticks = (0..columns.len())
            .map(|i| if i % TICK_EVERY == 0 { '|' } else { ' ' })
            .collect::<String>();
        lines.push(format!("        {ticks}"));

        lines.join("\n")
    }
}
