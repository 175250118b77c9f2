//! Lineprof - line-level execution profiler
//!
//! This library intercepts per-line execution events through a hook
//! chain, accumulates invocation counts and elapsed time per source line,
//! and renders a ranked, bounded report as text, JSON, or a sortable
//! HTML table. A recorded trace can be replayed through the same hot
//! path for offline analysis.

pub mod cli;
pub mod clock;
pub mod engine;
pub mod error;
pub mod hook;
pub mod html_output;
pub mod ignore;
pub mod json_output;
pub mod keys;
pub mod replay;
pub mod report;
pub mod store;
pub mod text_output;
