//! Memoized short display names for source paths
//!
//! Line identities use only the file name portion of a path, so two
//! distinct full paths with the same trailing component collide into one
//! identity and their statistics merge. Known limitation, kept for
//! stable identity strings across path-variant reporting.

use std::collections::HashMap;

/// Maps a full source path to its short display name, memoized
///
/// The cache lives as long as the session that owns it; there is no
/// invalidation.
#[derive(Debug, Default)]
pub struct LineKeyCache {
    names: HashMap<String, String>,
}

impl LineKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short display name for `full_path`, computed once per distinct path
    pub fn short_name_for(&mut self, full_path: &str) -> &str {
        self.names
            .entry(full_path.to_string())
            .or_insert_with(|| short_name(full_path))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Substring after the last path separator, or "?" when there is none
fn short_name(path: &str) -> String {
    match path.rfind(['/', '\\']) {
        Some(idx) => path[idx + 1..].to_string(),
        None => "?".to_string(),
    }
}
