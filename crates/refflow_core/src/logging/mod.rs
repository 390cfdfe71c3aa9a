//! Application-wide `tracing` setup and the per-export [`ExportLogger`].
//!
//! ```no_run
//! use refflow_core::logging::{ExportLogger, LogConfig};
//!
//! let logger = ExportLogger::new("Attacking Plays", "/path/to/logs", LogConfig::default(), None)
//!     .unwrap();
//!
//! logger.phase("Extract clips");
//! logger.command("ffmpeg -i input.mp4 ...");
//! logger.progress(50);
//! logger.success("Export completed");
//! ```

mod export_logger;
mod types;

pub use export_logger::{sanitize_filename, ExportLogger};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to `default_level`, and writes to
/// stderr. Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Like [`init_tracing`], additionally appending to a daily-rotated
/// `refflow.log` in `logs_dir`.
///
/// The returned guard must be held for the lifetime of the program so
/// buffered lines are flushed.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_dir, "refflow.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_str()))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn default_filter_uses_level_directive() {
        init_test_tracing();
        let filter = EnvFilter::new(LogLevel::Warn.as_str());
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
