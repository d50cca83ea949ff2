//! Logging setup.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix and suffix of the rolling log files.
const LOG_FILE_PREFIX: &str = "market-signal";
const LOG_FILE_SUFFIX: &str = "log";

/// Setup logging with the given level.
///
/// `RUST_LOG` takes precedence over `level`. Console output goes to stderr
/// so stdout stays reserved for signals. When `file_dir` is given, a
/// plain-text copy is written to a daily-rolling file there; keep the
/// returned guard alive until exit so buffered lines are flushed.
///
/// Fails without installing anything when the log directory cannot be
/// created.
pub fn setup_logging(level: &str, json: bool, file_dir: Option<&Path>) -> Result<Option<WorkerGuard>, InitError> {
    let appender = file_dir.map(daily_appender).transpose()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().pretty().with_writer(std::io::stderr).boxed()
    };

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn daily_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
}
