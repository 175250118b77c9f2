//! JSON report rendering for machine consumption

use crate::report::ReportRow;
use serde::Serialize;

/// Top-level JSON report document
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Session wall time in milliseconds, if a cycle completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_time_ms: Option<f64>,
    /// Number of emitted rows
    pub row_count: usize,
    /// Ranked rows, total time descending
    pub rows: &'a [ReportRow],
}

/// Render the ranked rows as a pretty-printed JSON document
pub fn render_json(rows: &[ReportRow], wall_micros: Option<u64>) -> serde_json::Result<String> {
    let report = JsonReport {
        wall_time_ms: wall_micros.map(|micros| micros as f64 / 1000.0),
        row_count: rows.len(),
        rows,
    };
    serde_json::to_string_pretty(&report)
}
