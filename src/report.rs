//! Report generation: ranking, truncation, and source resolution
//!
//! A read-only pass over the aggregation store, run after `stop()`. Rows
//! that cannot be resolved to source text, or whose text matches a
//! line-ignore rule, are silently dropped rather than failing the report.

use crate::engine::ProfilerSession;
use crate::ignore::IgnoreFilter;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use tracing::error;

/// Reads the full line-indexed text of a source file
pub trait SourceReader {
    /// All lines of `path`, or empty when the file does not exist
    fn read_lines(&self, path: &str) -> Vec<String>;
}

/// Filesystem-backed source reader
#[derive(Debug, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_lines(&self, path: &str) -> Vec<String> {
        fs::read_to_string(path)
            .map(|text| text.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

/// One resolved, rendered row of the final report
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// "name:line" identity string
    pub identity: String,
    /// Closed execution intervals attributed to this line
    pub hit_count: u64,
    /// Total elapsed time (microseconds)
    pub total_micros: u64,
    /// Total elapsed time (milliseconds)
    pub total_ms: f64,
    /// Average elapsed time per invocation (milliseconds)
    pub avg_ms: f64,
    /// Trimmed source text of the line
    pub source_text: String,
}

/// Builds the ranked, truncated, source-resolved report
#[derive(Debug)]
pub struct ReportBuilder {
    max_rows: usize,
}

impl ReportBuilder {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Snapshot, rank, truncate, and resolve the session's statistics
    ///
    /// Rows ranked within the budget but resolving to a removed or
    /// missing line are dropped without backfilling from lower ranks.
    pub fn build(&self, session: &ProfilerSession, reader: &dyn SourceReader) -> Vec<ReportRow> {
        let mut entries = session.store().snapshot();
        entries.sort_by(|a, b| {
            b.1.total_micros
                .cmp(&a.1.total_micros)
                .then(b.1.hit_count.cmp(&a.1.hit_count))
                .then_with(|| a.0.cmp(&b.0))
        });
        entries.truncate(self.max_rows);

        let filter = session.filter();
        let mut file_cache: HashMap<String, Vec<Option<String>>> = HashMap::new();
        let mut rows = Vec::with_capacity(entries.len());

        for (identity, stats) in entries {
            let lines = file_cache
                .entry(stats.source_path.clone())
                .or_insert_with(|| load_lines(reader, filter, &stats.source_path));

            let Some(line_number) = parse_line_number(&identity) else {
                // Identities are only ever built internally; a bad one is
                // an invariant violation, not a recoverable condition.
                error!(%identity, "line identity has no parsable line number");
                continue;
            };
            let Some(text) = line_number
                .checked_sub(1)
                .and_then(|index| lines.get(index as usize))
                .and_then(|cached| cached.as_ref())
            else {
                continue; // missing file, out-of-range, or removed line
            };

            // hit_count >= 1 for every stored record, so the average is
            // always defined.
            rows.push(ReportRow {
                total_ms: micros_to_ms(stats.total_micros),
                avg_ms: micros_to_ms(stats.total_micros) / stats.hit_count as f64,
                source_text: text.clone(),
                hit_count: stats.hit_count,
                total_micros: stats.total_micros,
                identity,
            });
        }

        rows
    }
}

/// Load a file once per report, applying line-ignore rules to the raw
/// text and trimming everything that survives
///
/// Removed lines are `None` so they can never collide with genuine
/// source text.
fn load_lines(
    reader: &dyn SourceReader,
    filter: &IgnoreFilter,
    path: &str,
) -> Vec<Option<String>> {
    reader
        .read_lines(path)
        .into_iter()
        .map(|raw| {
            if filter.should_ignore_line(&raw) {
                None
            } else {
                Some(raw.trim().to_string())
            }
        })
        .collect()
}

/// Line number parsed from the identity's suffix after the last ':'
fn parse_line_number(identity: &str) -> Option<u32> {
    identity.rsplit(':').next()?.parse().ok()
}

fn micros_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}
