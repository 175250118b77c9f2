//! Profiler session and the per-line event hot path
//!
//! `ProfilerSession` owns all mutable profiling state: the aggregation
//! store, ignore rules, display-name cache, and the current-line cursor.
//! `Profiler` is the shared fluent handle that registers the session with
//! a hook chain on `start()` and deregisters it on `stop()`.
//!
//! Timing model: the interval attributed to a line is the time between
//! consecutive line events, not the line's own instruction time. The
//! first event of a session opens an interval without closing one, and
//! the interval left open at `stop()` is discarded.

use crate::clock::{Clock, MonotonicClock};
use crate::error::ProfileError;
use crate::hook::{FrameInspector, HookChain, HookId, LineEvent, LineSubscriber, HOOK_FRAME_DEPTH};
use crate::ignore::IgnoreFilter;
use crate::keys::LineKeyCache;
use crate::report::{ReportBuilder, ReportRow, SourceReader};
use crate::store::AggregationStore;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Default row budget for generated reports
pub const DEFAULT_MAX_ROWS: usize = 30;

/// The line most recently entered but not yet closed out
#[derive(Debug)]
struct Cursor {
    identity: String,
    source_path: String,
    started_micros: u64,
}

/// All mutable state of one profiling session
///
/// Sessions accumulate across repeated start/stop cycles; statistics are
/// never reset between cycles.
pub struct ProfilerSession {
    clock: Rc<dyn Clock>,
    filter: IgnoreFilter,
    keys: LineKeyCache,
    store: AggregationStore,
    cursor: Option<Cursor>,
    started_micros: Option<u64>,
    stopped_micros: Option<u64>,
    max_rows: usize,
    hook_id: Option<HookId>,
}

impl ProfilerSession {
    fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            filter: IgnoreFilter::new(),
            keys: LineKeyCache::new(),
            store: AggregationStore::new(),
            cursor: None,
            started_micros: None,
            stopped_micros: None,
            max_rows: DEFAULT_MAX_ROWS,
            hook_id: None,
        }
    }

    /// The per-line hot path
    ///
    /// Closes the interval opened by the previous event, then opens a new
    /// one for this line. The cursor start is a second clock read taken
    /// after the close-out bookkeeping, so the bookkeeping cost is
    /// absorbed into every measurement instead of corrected for.
    pub fn on_line_event(&mut self, full_path: &str, line: u32) {
        if self.filter.should_ignore_file(full_path) {
            return;
        }
        let entry_micros = self.clock.now_micros();
        let identity = format!("{}:{}", self.keys.short_name_for(full_path), line);

        if let Some(cursor) = self.cursor.take() {
            let elapsed = entry_micros.saturating_sub(cursor.started_micros);
            self.store
                .close_interval(&cursor.identity, &cursor.source_path, elapsed);
        }

        self.cursor = Some(Cursor {
            identity,
            source_path: full_path.to_string(),
            started_micros: self.clock.now_micros(),
        });
    }

    fn begin(&mut self) {
        // A session must never instrument its own source.
        self.filter.add_file_ignore(file!());
        self.started_micros = Some(self.clock.now_micros());
        self.cursor = None;
    }

    fn finish(&mut self) {
        // The interval left open by the last event is discarded.
        self.stopped_micros = Some(self.clock.now_micros());
    }

    pub fn store(&self) -> &AggregationStore {
        &self.store
    }

    pub fn filter(&self) -> &IgnoreFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut IgnoreFilter {
        &mut self.filter
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn set_max_rows(&mut self, max_rows: usize) {
        self.max_rows = max_rows;
    }

    /// Wall time of the most recent start/stop cycle, if one completed
    pub fn wall_micros(&self) -> Option<u64> {
        match (self.started_micros, self.stopped_micros) {
            (Some(started), Some(stopped)) => Some(stopped.saturating_sub(started)),
            _ => None,
        }
    }
}

impl LineSubscriber for ProfilerSession {
    fn on_line(
        &mut self,
        event: &LineEvent,
        frames: &dyn FrameInspector,
    ) -> Result<(), ProfileError> {
        // Events whose frame cannot be resolved are unattributable.
        let Some(path) = frames.source_path(HOOK_FRAME_DEPTH) else {
            return Ok(());
        };
        self.on_line_event(&path, event.line);
        Ok(())
    }
}

/// Shared fluent handle over a profiling session
///
/// Configuration and lifecycle methods return the handle for chaining:
/// `profiler.set_max_rows(10).add_file_ignore("/vendor/")`.
#[derive(Clone)]
pub struct Profiler {
    session: Rc<RefCell<ProfilerSession>>,
}

impl Profiler {
    /// Session backed by a wall clock
    pub fn new() -> Self {
        Self::with_clock(Rc::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            session: Rc::new(RefCell::new(ProfilerSession::new(clock))),
        }
    }

    /// Begin a profiling cycle and subscribe to the hook chain
    pub fn start(&self, hooks: &mut HookChain) -> &Self {
        self.session.borrow_mut().begin();
        let id = hooks.register(self.session.clone());
        self.session.borrow_mut().hook_id = Some(id);
        self
    }

    /// End the cycle and unsubscribe; statistics are kept for reporting
    /// and for further cycles
    pub fn stop(&self, hooks: &mut HookChain) -> &Self {
        let id = {
            let mut session = self.session.borrow_mut();
            session.finish();
            session.hook_id.take()
        };
        if let Some(id) = id {
            hooks.deregister(id);
        }
        self
    }

    pub fn add_file_ignore(&self, pattern: &str) -> &Self {
        self.session.borrow_mut().filter_mut().add_file_ignore(pattern);
        self
    }

    pub fn add_line_ignore(&self, pattern: &str) -> Result<&Self, ProfileError> {
        self.session.borrow_mut().filter_mut().add_line_ignore(pattern)?;
        Ok(self)
    }

    pub fn set_max_rows(&self, max_rows: usize) -> &Self {
        self.session.borrow_mut().set_max_rows(max_rows);
        self
    }

    /// Read access to the underlying session
    pub fn session(&self) -> Ref<'_, ProfilerSession> {
        self.session.borrow()
    }

    /// Mutable access to the underlying session, for drivers that feed
    /// events directly instead of through a hook chain
    pub fn session_mut(&self) -> RefMut<'_, ProfilerSession> {
        self.session.borrow_mut()
    }

    /// Rank, truncate, and resolve the accumulated statistics
    pub fn build_report(&self, reader: &dyn SourceReader) -> Vec<ReportRow> {
        let session = self.session.borrow();
        ReportBuilder::new(session.max_rows()).build(&session, reader)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
