use anyhow::{Context, Result};
use clap::Parser;
use lineprof::clock::ManualClock;
use lineprof::cli::{Cli, OutputFormat};
use lineprof::engine::Profiler;
use lineprof::hook::HookChain;
use lineprof::html_output::HtmlReport;
use lineprof::json_output::render_json;
use lineprof::replay;
use lineprof::report::FsSourceReader;
use lineprof::text_output::render_text;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.max_rows == 0 {
        anyhow::bail!("Invalid value for --max-rows: 0 (must be >= 1)");
    }

    init_tracing(args.debug);

    let events = replay::read_trace(&args.trace)
        .with_context(|| format!("cannot read trace {}", args.trace.display()))?;

    let clock = Rc::new(ManualClock::new());
    let profiler = Profiler::with_clock(clock.clone());
    profiler.set_max_rows(args.max_rows);
    for pattern in &args.ignore_file {
        profiler.add_file_ignore(pattern);
    }
    for pattern in &args.ignore_line {
        profiler.add_line_ignore(pattern)?;
    }

    let mut hooks = HookChain::new();
    profiler.start(&mut hooks);
    replay::replay(&events, &clock, &hooks);
    profiler.stop(&mut hooks);

    let rows = profiler.build_report(&FsSourceReader);
    let wall_micros = profiler.session().wall_micros();

    let artifact = match args.format {
        OutputFormat::Text => render_text(&rows, wall_micros),
        OutputFormat::Json => render_json(&rows, wall_micros)?,
        OutputFormat::Html => HtmlReport::new(rows, wall_micros).to_html(),
    };

    match &args.output {
        Some(path) => std::fs::write(path, artifact)
            .with_context(|| format!("cannot write report to {}", path.display()))?,
        None => print!("{artifact}"),
    }

    Ok(())
}
