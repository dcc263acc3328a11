use anyhow::Result;
use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt::{self, time::OffsetTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Creates `log_dir` if needed and returns a daily-rolling appender in it.
pub fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("taskboard")
        .filename_suffix("log")
        .build(log_dir)?;

    Ok(appender)
}

/// Initialize logging for the server: console output plus, when a directory
/// is given, daily log files.
///
/// The returned guard flushes the file writer on drop and must be held until
/// shutdown.
pub fn init_server_logging(log_dir: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    // Local time can be unavailable in multi-threaded processes; fall back to UTC
    let timer = OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
        OffsetTime::new(
            time::UtcOffset::UTC,
            time::format_description::well_known::Rfc3339,
        )
    });

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_timer(timer.clone())
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            fmt::layer()
                .with_timer(timer)
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level(verbose))),
        )
        .init();

    tracing::info!("Logging system initialized");
    if let Some(dir) = log_dir {
        tracing::info!("Log files are being written to: {:?}", dir);
    }

    Ok(guard)
}

/// Plain console logging on stderr for the short-lived commands, so their
/// stdout stays machine-readable.
pub fn init_console_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(default_level(verbose))
        .with_writer(std::io::stderr)
        .init();
}

pub fn log_shutdown() {
    tracing::info!("=== Taskboard shutdown complete ===");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_appender_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs").join("nested");

        let _appender = file_appender(&log_dir).unwrap();
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "info");
    }
}
