//! File logging for the demo.
//!
//! The terminal belongs to the UI, so logs only go to a file:
//! `$TMPDIR/tui-sync-edit/tui-sync-edit.log`. Filtering follows `RUST_LOG`
//! (for example `RUST_LOG=sync_edit=debug`) and defaults to `info`.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directory holding the log file.
pub fn logs_dir() -> PathBuf {
    std::env::temp_dir().join("tui-sync-edit")
}

/// Install the subscriber. Keep the guard alive until exit so buffered lines are flushed.
pub fn init() -> Option<WorkerGuard> {
    let dir = logs_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Could not initialize file logging: {}", e);
        return None;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(dir, "tui-sync-edit.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Some(guard)
}
