//! Installs the `tracing` subscriber that renders every event as `[kind] message` (spec §6
//! "Logged events"), grounded on `game_core::logger::Logger` but trimmed down to what that
//! contract actually asks for: no color/TTY handling, no panic hook, no crash-report plumbing.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::sync::Mutex;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::metadata::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Installs the global subscriber. `quiet` raises the level filter to `warn` regardless of
/// `RUST_LOG` (spec §6 CLI `-q`/`--quiet`).
pub fn init(quiet: bool) {
    let level = if quiet {
        LevelFilter::WARN
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LevelFilter::INFO)
    };

    let file = File::create("shaq.log").ok().map(Mutex::new);
    let layer = Logger { level, file };
    tracing_subscriber::registry().with(layer).init();
}

struct Logger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl<S> Layer<S> for Logger
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > self.level {
            return;
        }

        let mut line = String::with_capacity(128);
        format_line(&mut line, event, Local::now().format("%Y-%m-%d %H:%M:%S%.3f"));

        print!("{line}");
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                file.write_all(line.as_bytes()).ok();
            }
        }
    }
}

fn format_line(buf: &mut String, event: &Event<'_>, timestamp: impl std::fmt::Display) {
    let kind = match *event.metadata().level() {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        Level::TRACE => "trace",
    };

    write!(buf, "[{kind}] {timestamp} {}: ", event.metadata().target()).ok();
    let mut visitor = Visitor { buf };
    event.record(&mut visitor);
    buf.push('\n');
}

struct Visitor<'a> {
    buf: &'a mut String,
}

impl Visit for Visitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => {
                write!(self.buf, "{value:?}").ok();
            }
            name => {
                write!(self.buf, "{name}={value:?} ").ok();
            }
        };
    }
}
