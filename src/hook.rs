//! Line-event hook chain
//!
//! The host runtime fires one event per executed source line. Subscribers
//! are invoked in registration order, and a failing subscriber is logged
//! and skipped without affecting the others, so a coverage hook and the
//! profiler can share the chain.
//!
//! The event itself carries only the kind and line number; the source
//! path is resolved through the `FrameInspector` collaborator at a fixed
//! depth, which accommodates one layer of wrapping by an outer hook.

use crate::error::ProfileError;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Stack depth of the frame whose source path is attributed, counted from
/// the hook callback and allowing for one wrapping hook layer
pub const HOOK_FRAME_DEPTH: usize = 3;

/// Kind of runtime event delivered to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A source line is about to execute
    Line,
}

/// One runtime event as delivered by the host hook
#[derive(Debug, Clone)]
pub struct LineEvent {
    pub kind: EventKind,
    pub line: u32,
}

/// Resolves the source path of a frame above the hook callback
pub trait FrameInspector {
    fn source_path(&self, depth: usize) -> Option<String>;
}

/// Inspector that reports one known source path at any depth
///
/// Used by trace replay and tests, where the frame of interest is
/// recorded alongside the event rather than live on a stack.
#[derive(Debug, Clone)]
pub struct FixedFrame {
    path: String,
}

impl FixedFrame {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameInspector for FixedFrame {
    fn source_path(&self, _depth: usize) -> Option<String> {
        Some(self.path.clone())
    }
}

/// Receiver of line events
pub trait LineSubscriber {
    fn on_line(
        &mut self,
        event: &LineEvent,
        frames: &dyn FrameInspector,
    ) -> Result<(), ProfileError>;
}

/// Handle returned by registration, used to deregister
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u64);

/// Ordered list of line-event subscribers
#[derive(Default)]
pub struct HookChain {
    subscribers: Vec<(HookId, Rc<RefCell<dyn LineSubscriber>>)>,
    next_id: u64,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber; it will be invoked after all earlier ones
    pub fn register(&mut self, subscriber: Rc<RefCell<dyn LineSubscriber>>) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Remove a subscriber; unknown ids are a no-op
    pub fn deregister(&mut self, id: HookId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver one event to every subscriber in registration order
    ///
    /// Each subscriber gets its own error isolation: a failure is logged
    /// and the remaining subscribers still run.
    pub fn dispatch(&self, event: &LineEvent, frames: &dyn FrameInspector) {
        for (id, subscriber) in &self.subscribers {
            if let Err(err) = subscriber.borrow_mut().on_line(event, frames) {
                warn!(hook_id = id.0, error = %err, "line hook subscriber failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl LineSubscriber for Recorder {
        fn on_line(
            &mut self,
            event: &LineEvent,
            _frames: &dyn FrameInspector,
        ) -> Result<(), ProfileError> {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.label, event.line));
            if self.fail {
                return Err(ProfileError::Subscriber(self.label.to_string()));
            }
            Ok(())
        }
    }

    fn line_event(line: u32) -> LineEvent {
        LineEvent {
            kind: EventKind::Line,
            line,
        }
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = HookChain::new();
        chain.register(Rc::new(RefCell::new(Recorder {
            label: "first",
            log: log.clone(),
            fail: false,
        })));
        chain.register(Rc::new(RefCell::new(Recorder {
            label: "second",
            log: log.clone(),
            fail: false,
        })));

        chain.dispatch(&line_event(7), &FixedFrame::new("/app/a.lua"));
        assert_eq!(*log.borrow(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_the_chain() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = HookChain::new();
        chain.register(Rc::new(RefCell::new(Recorder {
            label: "broken",
            log: log.clone(),
            fail: true,
        })));
        chain.register(Rc::new(RefCell::new(Recorder {
            label: "healthy",
            log: log.clone(),
            fail: false,
        })));

        chain.dispatch(&line_event(1), &FixedFrame::new("/app/a.lua"));
        assert_eq!(*log.borrow(), vec!["broken:1", "healthy:1"]);
    }

    #[test]
    fn test_deregister_removes_only_that_subscriber() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = HookChain::new();
        let first = chain.register(Rc::new(RefCell::new(Recorder {
            label: "first",
            log: log.clone(),
            fail: false,
        })));
        chain.register(Rc::new(RefCell::new(Recorder {
            label: "second",
            log: log.clone(),
            fail: false,
        })));

        chain.deregister(first);
        assert_eq!(chain.len(), 1);

        chain.dispatch(&line_event(3), &FixedFrame::new("/app/a.lua"));
        assert_eq!(*log.borrow(), vec!["second:3"]);
    }

    #[test]
    fn test_deregister_unknown_id_is_noop() {
        let mut chain = HookChain::new();
        let id = chain.register(Rc::new(RefCell::new(Recorder {
            label: "only",
            log: Rc::new(RefCell::new(Vec::new())),
            fail: false,
        })));
        chain.deregister(id);
        chain.deregister(id);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_fixed_frame_reports_its_path_at_hook_depth() {
        let frame = FixedFrame::new("/app/a.lua");
        assert_eq!(
            frame.source_path(HOOK_FRAME_DEPTH),
            Some("/app/a.lua".to_string())
        );
    }
}
