use crate::error::{Result as ServerErrorResult, ServerError};

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use fanout_config::LoggingConfig;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback, Output};
use log::{LevelFilter, Record, info};

/// Crates whose per-frame chatter is capped at `warn`
const NOISY_DEPENDENCIES: [&str; 4] = ["hyper", "tungstenite", "tokio_tungstenite", "axum"];

/// Initialize the global logger from the `[logging]` section.
///
/// `log_file` is the resolved path of `logging.file`; None logs to stdout.
/// Colors only apply to stdout.
#[track_caller]
pub fn initialize(logging: &LoggingConfig, log_file: Option<PathBuf>) -> ServerErrorResult<()> {
    let level = logging.level.0;

    let output: Output = match log_file {
        Some(ref log_path) => std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|e| {
                ServerError::io(format!("Failed to open log file {}", log_path.display()), e)
            })?
            .into(),
        None => std::io::stdout().into(),
    };

    let colors = (logging.colored && log_file.is_none()).then(|| {
        ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red)
    });

    NOISY_DEPENDENCIES
        .iter()
        .fold(Dispatch::new().level(level), |dispatch, target| {
            dispatch.level_for(*target, dependency_level(level))
        })
        .format(move |out, message, record| match &colors {
            Some(colors) => write_line(out, message, record, colors.color(record.level())),
            None => write_line(out, message, record, record.level()),
        })
        .chain(output)
        .apply()
        .map_err(|e| ServerError::logger(format!("Failed to initialize logger: {e}")))?;

    match log_file {
        Some(ref path) => info!("Logger initialized: level={level}, file={}", path.display()),
        None => info!("Logger initialized: level={level}, stdout"),
    }

    Ok(())
}

/// Level applied to transport crates: never more verbose than `warn`
pub(crate) fn dependency_level(level: LevelFilter) -> LevelFilter {
    level.min(LevelFilter::Warn)
}

fn write_line(
    out: FormatCallback,
    message: &fmt::Arguments,
    record: &Record,
    level: impl fmt::Display,
) {
    out.finish(format_args!(
        "[{date} - {level}] {target}: {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        target = record.target(),
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}
