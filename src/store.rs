//! Per-line aggregation of invocation counts and elapsed time
//!
//! The store is the single mutable state of the engine. It is written
//! only from the event callback and read only during report generation,
//! after `stop()`.

use std::collections::HashMap;

/// Accumulated statistics for a single line identity
///
/// Created lazily on the first closed interval for that identity, so
/// `hit_count` is always >= 1 for any record that exists. Count and total
/// only grow for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct LineStats {
    /// Number of closed execution intervals attributed to this line
    pub hit_count: u64,
    /// Total elapsed time across those intervals (microseconds)
    pub total_micros: u64,
    /// Full source path as reported by the runtime, for source resolution
    pub source_path: String,
}

/// Map from line identity ("name:line") to accumulated statistics
#[derive(Debug, Default)]
pub struct AggregationStore {
    stats: HashMap<String, LineStats>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close one execution interval for `identity`
    pub fn close_interval(&mut self, identity: &str, source_path: &str, elapsed_micros: u64) {
        let entry = self.stats.entry(identity.to_string()).or_default();
        if entry.source_path.is_empty() {
            entry.source_path = source_path.to_string();
        }
        entry.hit_count += 1;
        entry.total_micros += elapsed_micros;
    }

    pub fn get(&self, identity: &str) -> Option<&LineStats> {
        self.stats.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.stats.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Total closed intervals across all identities
    pub fn total_hits(&self) -> u64 {
        self.stats.values().map(|s| s.hit_count).sum()
    }

    /// Owned copy of all entries for ranking
    pub fn snapshot(&self) -> Vec<(String, LineStats)> {
        self.stats
            .iter()
            .map(|(identity, stats)| (identity.clone(), stats.clone()))
            .collect()
    }
}
