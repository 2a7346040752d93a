//! Logger setup shared by the truck executables
//!
//! Records go to the terminal with coloured level tags and to the session log file as plain text.
//! Per-rule inference output is held back to `DEBUG` so a `TRACE` session still reads as one line
//! per iteration.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use colored::{ColoredString, Colorize};
use log::{self, info};
use thiserror::Error;

use crate::session;

pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Module whose per-rule output is capped at `DEBUG`.
const INFERENCE_TARGET: &str = "truck_lib::fuzzy";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Could not open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `min_level` must be `Info` or more verbose. Only call this once per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    check_min_level(min_level)?;

    let terminal = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::get_elapsed_seconds(),
                level_tag(record.level()),
                with_target(record, message)
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::get_elapsed_seconds(),
                level_str(record.level()),
                with_target(record, message)
            ))
        })
        .chain(
            fern::log_file(session.log_file_path.clone())
                .map_err(LoggerInitError::LogFileInitError)?,
        );

    fern::Dispatch::new()
        .level(min_level)
        .level_for(INFERENCE_TARGET, inference_level(min_level))
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    } else {
        Ok(())
    }
}

fn inference_level(min_level: LevelFilter) -> LevelFilter {
    min_level.min(LevelFilter::Debug)
}

/// Debug and trace records carry their target.
fn with_target(record: &log::Record, message: &std::fmt::Arguments) -> String {
    if record.level() > log::Level::Info {
        format!("{}: {}", record.target(), message)
    } else {
        message.to_string()
    }
}

fn level_str(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info => "INF",
        log::Level::Warn => "WRN",
        log::Level::Error => "ERR",
    }
}

fn level_tag(level: log::Level) -> ColoredString {
    let tag = level_str(level);

    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info => tag.normal(),
        log::Level::Warn => tag.yellow(),
        log::Level::Error => tag.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_min_level() {
        assert!(matches!(
            check_min_level(LevelFilter::Warn),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
        assert!(check_min_level(LevelFilter::Off).is_err());
        assert!(check_min_level(LevelFilter::Info).is_ok());
        assert!(check_min_level(LevelFilter::Trace).is_ok());
    }

    #[test]
    fn test_inference_level() {
        assert_eq!(inference_level(LevelFilter::Trace), LevelFilter::Debug);
        assert_eq!(inference_level(LevelFilter::Debug), LevelFilter::Debug);
        assert_eq!(inference_level(LevelFilter::Info), LevelFilter::Info);
    }

    #[test]
    fn test_level_str() {
        assert_eq!(level_str(log::Level::Trace), "TRC");
        assert_eq!(level_str(log::Level::Error), "ERR");
    }
}
