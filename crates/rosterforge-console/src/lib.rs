//! Colorful console output for enumeration runs.
//!
//! Provides a `tracing` layer that formats run and stage events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Run lifecycle (start, end)
//! - **WARN**: Cancellation
//! - **DEBUG**: Stage start and end with survivor counts
//! - **TRACE**: Stage bounds and skipped banned pairs

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

const DEFAULT_FILTER: &str = "rosterforge_solver=info,rosterforge_scoring=warn";

/// Installs the console layer as the global subscriber.
///
/// Only the first call has an effect. `RUST_LOG` overrides the default
/// filter, e.g. `RUST_LOG=rosterforge_solver=debug` to see every stage.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RunConsoleLayer)
            .try_init();
    });
}

fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats enumeration events with colors.
pub struct RunConsoleLayer;

impl<S: Subscriber> Layer<S> for RunConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("rosterforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    format: Option<String>,
    mode: Option<String>,
    stage: Option<String>,
    rule: Option<String>,
    index: Option<u64>,
    entity_count: Option<u64>,
    stage_count: Option<u64>,
    threads: Option<u64>,
    candidates: Option<u64>,
    survivors: Option<u64>,
    lineup_count: Option<u64>,
    raw_lineups: Option<u64>,
    cache_entries: Option<u64>,
    duration_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    floor: Option<i64>,
    ceiling: Option<i64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "index" => self.index = Some(value),
            "entity_count" => self.entity_count = Some(value),
            "stage_count" => self.stage_count = Some(value),
            "threads" => self.threads = Some(value),
            "candidates" => self.candidates = Some(value),
            "survivors" => self.survivors = Some(value),
            "lineup_count" => self.lineup_count = Some(value),
            "raw_lineups" => self.raw_lineups = Some(value),
            "cache_entries" => self.cache_entries = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "floor" => self.floor = Some(value),
            "ceiling" => self.ceiling = Some(value),
            _ => self.record_u64(field, value.max(0) as u64),
        }
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "format" => self.format = Some(value),
            "mode" => self.mode = Some(value),
            "stage" => self.stage = Some(value),
            "rule" => self.rule = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "run_start" => format_run_start(v),
        "run_end" => format_run_end(v),
        "run_cancelled" => format_run_cancelled(v),
        "stage_start" => format_stage_start(v),
        "stage_end" => format_stage_end(v),
        "stage_bounds" if level == Level::TRACE => format_stage_bounds(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_run_start(v: &EventVisitor) -> String {
    mark_run_start();
    let format = v.format.as_deref().unwrap_or("?");
    let mode = v.mode.as_deref().unwrap_or("?");

    let mut output = format!(
        "{} {} Enumerating │ {} {} │ {} entities │ {} stages",
        format_elapsed(),
        "▶".bright_green().bold(),
        format.white().bold(),
        mode.bright_magenta(),
        count(v.entity_count).bright_yellow(),
        count(v.stage_count).bright_yellow(),
    );
    if let Some(threads) = v.threads.filter(|t| *t > 1) {
        output.push_str(&format!(" │ {} threads", threads.bright_yellow()));
    }
    output
}

fn format_run_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Done │ {} lineups │ {} raw │ {} candidates │ {} cached │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        count(v.lineup_count).bright_green().bold(),
        count(v.raw_lineups).white(),
        count(v.candidates).white(),
        count(v.cache_entries).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_run_cancelled(v: &EventVisitor) -> String {
    format!(
        "{} {} Cancelled after {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
    )
}

fn format_stage_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {}",
        format_elapsed(),
        "▶".bright_blue(),
        v.stage.as_deref().unwrap_or("?").white().bold(),
        format!("({})", v.rule.as_deref().unwrap_or("?")).bright_black(),
    )
}

fn format_stage_end(v: &EventVisitor) -> String {
    let candidates = v.candidates.unwrap_or(0);
    let survivors = v.survivors.unwrap_or(0);

    format!(
        "{} {} {} │ {} → {} │ {} kept │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.stage.as_deref().unwrap_or("?").white().bold(),
        candidates.to_formatted_string(&Locale::en).white(),
        survivors
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        format_rate(survivors, candidates).bright_yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_stage_bounds(v: &EventVisitor) -> String {
    let bound = |value: Option<i64>| match value {
        Some(value) if value != i64::MIN && value != i64::MAX => value.to_formatted_string(&Locale::en),
        _ => "-".to_string(),
    };
    format!(
        "{}   {} [{}, {}]",
        format_elapsed(),
        v.stage.as_deref().unwrap_or("?").bright_black(),
        bound(v.floor).bright_black(),
        bound(v.ceiling).bright_black(),
    )
}

fn format_rate(survivors: u64, candidates: u64) -> String {
    if candidates == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", survivors as f64 * 100.0 / candidates as f64)
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
