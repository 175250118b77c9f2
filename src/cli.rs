//! CLI argument parsing for Lineprof

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for profile reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// Static HTML document with a sortable table
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "lineprof")]
#[command(version)]
#[command(about = "Line-level execution profiler with trace replay and sortable reports", long_about = None)]
pub struct Cli {
    /// Recorded line-event trace to replay (JSON Lines: {"path", "line", "ts_us"})
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Output format (text, json, or html)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep at most N ranked rows in the report
    #[arg(long = "max-rows", value_name = "N", default_value = "30")]
    pub max_rows: usize,

    /// Exclude files whose full path contains PATTERN (repeatable)
    #[arg(long = "ignore-file", value_name = "PATTERN")]
    pub ignore_file: Vec<String>,

    /// Exclude source lines matching REGEX from the report (repeatable)
    #[arg(long = "ignore-line", value_name = "REGEX")]
    pub ignore_line: Vec<String>,

    /// Enable internal debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
