//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout stays reserved for the summary.
//! Per-file problems are logged at `warn`, pipeline milestones at `info`.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at program start.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=deadview=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs a named event, picking the level from the event name.
pub fn log_event(event: &str, detail: &str) {
    match event.to_uppercase().as_str() {
        "ERROR" => error!(event = %event, detail = %detail),
        "WARN" | "WARNING" | "SKIPPED_FILE" => warn!(event = %event, detail = %detail),
        _ => info!(event = %event, detail = %detail),
    }
}
