//! Recorded-trace replay
//!
//! A trace is JSON Lines, one event per line:
//! `{"path": "/app/a.lua", "line": 10, "ts_us": 1000}`. Replay sets the
//! shared clock to each event's timestamp before dispatching, so every
//! hot-path read during that event (entry and cursor-set) observes the
//! recorded time and replayed intervals are exactly the event-to-event
//! deltas. An event on an ignored file performs no reads and merely
//! advances the clock. Dispatch goes through the hook chain so the same
//! code path runs as under live instrumentation.

use crate::clock::ManualClock;
use crate::error::ProfileError;
use crate::hook::{EventKind, FixedFrame, HookChain, LineEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One recorded line-execution event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Full source path as the runtime reported it
    pub path: String,
    /// Executed line number (1-based)
    pub line: u32,
    /// Monotonic timestamp at the event (microseconds)
    pub ts_us: u64,
}

/// Load a JSON Lines trace file
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, ProfileError> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text, &path.display().to_string())
}

/// Parse trace text; blank lines are skipped, anything else must decode
pub fn parse_trace(text: &str, origin: &str) -> Result<Vec<TraceEvent>, ProfileError> {
    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: TraceEvent =
            serde_json::from_str(line).map_err(|err| ProfileError::MalformedTrace {
                origin: origin.to_string(),
                line: index + 1,
                message: err.to_string(),
            })?;
        events.push(event);
    }
    Ok(events)
}

/// Replay events through the hook chain against a shared manual clock
pub fn replay(events: &[TraceEvent], clock: &ManualClock, hooks: &HookChain) {
    for event in events {
        clock.set_now(event.ts_us);
        let frame = FixedFrame::new(event.path.as_str());
        hooks.dispatch(
            &LineEvent {
                kind: EventKind::Line,
                line: event.line,
            },
            &frame,
        );
    }
}
