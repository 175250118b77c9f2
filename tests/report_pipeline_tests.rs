//! End-to-end pipeline tests: replayed events through the hook chain,
//! aggregation, ranking, and source resolution against real files.

use lineprof::clock::ManualClock;
use lineprof::engine::Profiler;
use lineprof::hook::HookChain;
use lineprof::replay::{replay, TraceEvent};
use lineprof::report::FsSourceReader;
use std::io::Write;
use std::rc::Rc;

const SOURCE: &str = "local total = 0
for i = 1, 100 do
    total = total + i
end
assert(total > 0)
return total
";

fn write_source(dir: &tempfile::TempDir, name: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SOURCE.as_bytes()).unwrap();
    path.display().to_string()
}

fn event(path: &str, line: u32, ts_us: u64) -> TraceEvent {
    TraceEvent {
        path: path.to_string(),
        line,
        ts_us,
    }
}

#[test]
fn test_replayed_trace_produces_ranked_resolved_rows() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "hot.lua");

    let events = vec![
        event(&source, 2, 0),
        event(&source, 3, 300),
        event(&source, 2, 1000),
        event(&source, 3, 1300),
        event(&source, 6, 5000),
    ];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    let rows = profiler.build_report(&FsSourceReader);

    // line 3 carries 700 + 3700 us, line 2 carries 300 + 300 us; line 6
    // was never closed out.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].identity, "hot.lua:3");
    assert_eq!(rows[0].hit_count, 2);
    assert_eq!(rows[0].total_micros, 4400);
    assert_eq!(rows[0].source_text, "total = total + i");
    assert_eq!(rows[1].identity, "hot.lua:2");
    assert_eq!(rows[1].total_micros, 600);
    assert!(rows[0].total_micros >= rows[1].total_micros);
}

#[test]
fn test_assertion_line_never_reaches_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "checked.lua");

    // Line 5 is the assert call and accumulates the most time by far.
    let events = vec![
        event(&source, 5, 0),
        event(&source, 6, 90_000),
        event(&source, 1, 91_000),
    ];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    let rows = profiler.build_report(&FsSourceReader);
    assert!(rows.iter().all(|row| row.identity != "checked.lua:5"));
    assert!(rows.iter().any(|row| row.identity == "checked.lua:6"));
}

#[test]
fn test_ignored_file_between_kept_events_is_excluded_without_skew() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "mix.lua");

    // A vendored event sits between two kept events; it must neither
    // appear in the store nor disturb the kept lines' intervals.
    let events = vec![
        event(&source, 2, 0),
        event("/app/vendor/dep.lua", 7, 700),
        event(&source, 3, 1000),
        event(&source, 6, 1500),
    ];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    assert!(!profiler.session().store().contains("dep.lua:7"));

    let rows = profiler.build_report(&FsSourceReader);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].identity, "mix.lua:2");
    assert_eq!(rows[0].total_micros, 1000);
    assert_eq!(rows[1].identity, "mix.lua:3");
    assert_eq!(rows[1].total_micros, 500);
    assert!(rows.iter().all(|row| !row.identity.starts_with("dep.lua")));
}

#[test]
fn test_missing_source_file_drops_rows_without_failing() {
    let missing = "/definitely/not/here/ghost.lua";
    let events = vec![
        event(missing, 1, 0),
        event(missing, 2, 100),
        event(missing, 3, 200),
    ];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    assert_eq!(profiler.session().store().len(), 2);
    let rows = profiler.build_report(&FsSourceReader);
    assert!(rows.is_empty());
}

#[test]
fn test_two_cycles_accumulate_into_one_report() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "twice.lua");

    let first = vec![event(&source, 2, 0), event(&source, 3, 500)];
    let second = vec![event(&source, 2, 10_000), event(&source, 3, 10_500)];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    let mut hooks = HookChain::new();

    profiler.start(&mut hooks);
    replay(&first, &clock, &hooks);
    profiler.stop(&mut hooks);

    profiler.start(&mut hooks);
    replay(&second, &clock, &hooks);
    profiler.stop(&mut hooks);

    let rows = profiler.build_report(&FsSourceReader);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].identity, "twice.lua:2");
    assert_eq!(rows[0].hit_count, 2);
    assert_eq!(rows[0].total_micros, 1000);
}

#[test]
fn test_max_rows_bounds_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(&dir, "wide.lua");

    // Touch lines 1, 2, 3, 4 in turn; three intervals close.
    let events = vec![
        event(&source, 1, 0),
        event(&source, 2, 100),
        event(&source, 3, 300),
        event(&source, 4, 600),
    ];

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    profiler.set_max_rows(2);
    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    let rows = profiler.build_report(&FsSourceReader);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].identity, "wide.lua:3");
    assert_eq!(rows[1].identity, "wide.lua:2");
}
