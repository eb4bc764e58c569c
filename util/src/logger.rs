//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Records go to stdout with coloured level tags and to the session log file
/// without colour codes. `module_levels` allows noisy modules (e.g. the
/// per-cycle trace output of the mapper) to be given a different level to the
/// rest of the executable.
///
/// # Notes
///
/// - `min_level` must be greater than `log::Level::Info`.
/// - Must only be called once per process, `log` only accepts one logger.
pub fn logger_init(
    min_level: LevelFilter,
    module_levels: &[(&'static str, LevelFilter)],
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(min_level);

    for (module, level) in module_levels {
        dispatch = dispatch.level_for(*module, *level);
    }

    let stdout = fern::Dispatch::new()
        .format(|out, message, record| {
            let tag = level_to_str(record.level());
            out.finish(format_args!("{}", format_record(tag, message, record)))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            let tag = level_to_str(record.level()).clear();
            out.finish(format_args!("{}", format_record(tag, message, record)))
        })
        .chain(log_file);

    dispatch
        .chain(stdout)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (module, level) in module_levels {
        info!("    {} level: {:?}", module, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build a log line stamped with the elapsed session time.
///
/// Debug and trace records include their target so per-cycle output can be
/// traced back to the module emitting it.
fn format_record(
    tag: ColoredString,
    message: &fmt::Arguments,
    record: &log::Record
) -> String {
    if record.level() > log::Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            tag,
            record.target(),
            message
        )
    }
    else {
        format!(
            "[{:10.6} {}] {}",
            session::get_elapsed_seconds(),
            tag,
            message
        )
    }
}

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_tags_plain() {
        assert_eq!(level_to_str(log::Level::Warn).clear().to_string(), "WRN");
        assert_eq!(level_to_str(log::Level::Trace).clear().to_string(), "TRC");
    }
}
