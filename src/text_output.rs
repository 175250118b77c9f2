//! Plain-text report rendering

use crate::report::ReportRow;
use std::fmt::Write;

/// Render the ranked rows as an aligned-column text table
pub fn render_text(rows: &[ReportRow], wall_micros: Option<u64>) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("No line profiling data collected.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24} {:>8} {:>14} {:>14}  {}",
        "Line", "Hits", "Total (ms)", "Avg (ms)", "Source"
    );
    let _ = writeln!(out, "{}", "─".repeat(80));

    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>14.4} {:>14.4}  {}",
            row.identity, row.hit_count, row.total_ms, row.avg_ms, row.source_text
        );
    }

    let _ = writeln!(out, "{}", "─".repeat(80));
    if let Some(wall) = wall_micros {
        let _ = writeln!(out, "Session wall time: {:.4} ms", wall as f64 / 1000.0);
    }

    out
}
