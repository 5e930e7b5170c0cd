use log::{Level, LevelFilter, Metadata, Record};

use crate::Error;

/// Logger instance registered by [`StdoutLogger::register`].
pub static STDOUT_LOGGER: StdoutLogger = StdoutLogger::new();

/// A simple logger struct that logs to stdout when used with [`log::set_logger`].
///
/// The build orchestrator only scrapes runner stdout for status lines,
/// so every level goes there, errors included.
#[derive(Debug)]
pub struct StdoutLogger {}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutLogger {
    /// Create a new [`log::Log`] logger that will write log to stdout
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Register this logger as the global one, at `Info` level.
    pub fn register() -> Result<(), Error> {
        log::set_logger(&STDOUT_LOGGER).map_err(|_| Error::unknown("Failed to register logger"))?;
        log::set_max_level(LevelFilter::Info);
        Ok(())
    }
}

impl log::Log for StdoutLogger {
    #[inline]
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let marker = match record.level() {
            Level::Error => "[-]",
            Level::Warn => "[!]",
            _ => "[*]",
        };
        println!("{marker} {}", record.args());
    }

    fn flush(&self) {}
}
