//! Ignore filtering for files and source lines
//!
//! Two independent rule sets:
//! - File rules are literal substrings tested against the full source path
//!   on every line event (the hot-path short-circuit).
//! - Line rules are regular expressions tested against raw, untrimmed
//!   source text at report-generation time only.
//!
//! Both sets are append-only; duplicate rules are harmless and are not
//! deduplicated.

use crate::error::ProfileError;
use regex::Regex;

/// File-path substrings excluded out of the box
const DEFAULT_FILE_IGNORES: &[&str] = &["/test/", "/tests/", "/vendor/"];

/// Assertion calls are noise in a line-time ranking
const DEFAULT_LINE_IGNORE: &str = r"^\s*assert";

/// Decides which files and source lines stay out of the report
#[derive(Debug)]
pub struct IgnoreFilter {
    file_rules: Vec<String>,
    line_rules: Vec<Regex>,
}

impl IgnoreFilter {
    /// Create a filter seeded with the default rule sets
    pub fn new() -> Self {
        let default_line = Regex::new(DEFAULT_LINE_IGNORE).expect("default pattern compiles");
        Self {
            file_rules: DEFAULT_FILE_IGNORES.iter().map(|s| s.to_string()).collect(),
            line_rules: vec![default_line],
        }
    }

    /// Create a filter with no rules at all
    pub fn empty() -> Self {
        Self {
            file_rules: Vec::new(),
            line_rules: Vec::new(),
        }
    }

    /// Append a file-path substring rule
    pub fn add_file_ignore(&mut self, pattern: impl Into<String>) {
        self.file_rules.push(pattern.into());
    }

    /// Append a line-content rule; the pattern must compile as a regex
    pub fn add_line_ignore(&mut self, pattern: &str) -> Result<(), ProfileError> {
        let rule = Regex::new(pattern).map_err(|source| ProfileError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.line_rules.push(rule);
        Ok(())
    }

    /// True if `path` contains any registered file-ignore substring
    pub fn should_ignore_file(&self, path: &str) -> bool {
        self.file_rules.iter().any(|rule| path.contains(rule.as_str()))
    }

    /// True if the raw source text matches any registered line-ignore rule
    pub fn should_ignore_line(&self, raw_text: &str) -> bool {
        self.line_rules.iter().any(|rule| rule.is_match(raw_text))
    }
}

impl Default for IgnoreFilter {
    fn default() -> Self {
        Self::new()
    }
}
