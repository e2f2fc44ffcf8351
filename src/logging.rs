use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging(log_dir: &Path) {
    let _ = fs::create_dir_all(log_dir);

    // Daily rotation, JSON lines in the file, human readable on the console
    let file_appender = tracing_appender::rolling::daily(log_dir, "concept_migrator.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("concept_migrator=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // The guard flushes on drop; the process is short lived so keep it until exit
    std::mem::forget(guard);
}
