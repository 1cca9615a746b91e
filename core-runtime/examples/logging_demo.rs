//! Logging system demonstration
//!
//! Shows the log output a host sees while a composed player runs.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "core_sequencer=trace"
//! ```

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;
use tracing::{debug, error, info, span, trace, warn, Level};

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let filter = args.get(2).cloned();

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_target(true)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Some(f) = filter {
        config = config.with_filter(f);
    }

    if let Err(e) = init_logging(config) {
        eprintln!("{}", e);
        return;
    }

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    demo_log_levels();
    demo_sequencer_logs();

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log");
    error!("This is an ERROR level log");
}

fn demo_sequencer_logs() {
    let span = span!(Level::INFO, "sequencer", id = "seq");
    let _enter = span.enter();

    debug!(target: "core_sequencer", child = "intro", "Child media ready");
    debug!(target: "core_sequencer", child = "main", "Child media ready");
    debug!(target: "core_sequencer", duration = 42.5, "Sequencer ready");
    debug!(target: "core_sequencer", child = "intro", time = 0.0, "New current child media");
    debug!(target: "core_sequencer", child = "intro", "Start to relay events");
    warn!(target: "core_sequencer", child = "broken", "Clip has no playable length");
}
