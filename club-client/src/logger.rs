//! Logging Infrastructure
//!
//! Structured logging via `tracing`, to stdout or to daily rolling files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::ClientConfig;

/// Initialize the logger from client configuration
pub fn init_from_config(config: &ClientConfig) {
    init_logger(Some(&config.log_level), config.log_dir.as_deref());
}

/// Initialize the logger
///
/// `RUST_LOG` wins over `log_level`. When `log_dir` exists, output goes to a
/// daily rolling file there instead of stdout. Calling this twice is harmless:
/// the second subscriber is simply not installed.
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "club-client");
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
        eprintln!("Log directory '{}' does not exist, logging to stdout", dir);
    }

    let _ = subscriber.try_init();
}
