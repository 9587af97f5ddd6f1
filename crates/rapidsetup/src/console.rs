//! Colorful console output for trigger verdicts.
//!
//! Provides a custom `tracing` layer that formats trigger events with colors.
//! Enabled with the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVES: &str = "rapidsetup_constraint=info,rapidsetup=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default directives. A global subscriber installed elsewhere
/// wins silently.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(TriggerConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats trigger events with colors.
pub struct TriggerConsoleLayer;

impl<S: Subscriber> Layer<S> for TriggerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("rapidsetup") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    process: Option<String>,
    identity: Option<String>,
    result: Option<bool>,
    evaluated: Option<u64>,
    matched: Option<u64>,
    skipped: Option<u64>,
    failed: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "process" => self.process = Some(value.to_string()),
            "identity" => self.identity = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "result" {
            self.result = Some(value);
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "evaluated" => self.evaluated = Some(value),
            "matched" => self.matched = Some(value),
            "skipped" => self.skipped = Some(value),
            "failed" => self.failed = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("trigger_evaluated") => format_trigger_evaluated(v),
        Some("run_completed") => format_run_completed(v),
        _ => String::new(),
    }
}

fn format_trigger_evaluated(v: &EventVisitor) -> String {
    let process = v.process.as_deref().unwrap_or("unknown");
    let identity = v.identity.as_deref().unwrap_or("");
    let verdict = if v.result.unwrap_or(false) {
        "fires".bright_green().bold().to_string()
    } else {
        "does not fire".bright_black().to_string()
    };

    format!(
        "{} {} {} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", process).bright_cyan(),
        identity.white().bold(),
        verdict
    )
}

fn format_run_completed(v: &EventVisitor) -> String {
    let process = v.process.as_deref().unwrap_or("unknown");
    let failed = v.failed.unwrap_or(0);
    let failed = if failed > 0 {
        failed.to_string().bright_red().bold().to_string()
    } else {
        failed.to_string().white().to_string()
    };

    format!(
        "{} {} {} Run completed: evaluated ({}), matched ({}), skipped ({}), failed ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", process).bright_cyan(),
        v.evaluated.unwrap_or(0).to_string().white(),
        v.matched.unwrap_or(0).to_string().bright_green(),
        v.skipped.unwrap_or(0).to_string().yellow(),
        failed
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}
