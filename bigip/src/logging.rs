//! Logging capability injected into the session factory.
//!
//! Production code logs through [`TracingLogger`]; tests and embedding hosts
//! can pass a [`RecordingLogger`] and inspect the `[LEVEL] message` lines.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(name)
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{}", message),
            Level::Warn => tracing::warn!("{}", message),
            Level::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Lines logged at `level`, without the prefix
    pub fn messages(&self, level: Level) -> Vec<String> {
        let prefix = format!("[{}] ", level);
        self.lines()
            .into_iter()
            .filter_map(|line| line.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(format!("[{}] {}", level, message));
    }
}

/// Install a `fmt` subscriber for the host process. Later calls are no-ops.
pub fn init(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_logger_renders_level_prefix() {
        let logger = RecordingLogger::new();
        logger.info("Initializing BigIP connection");
        logger.warn("Could not validate connection to BigIP");
        logger.error("boom");

        assert_eq!(
            logger.lines(),
            vec![
                "[INFO] Initializing BigIP connection",
                "[WARN] Could not validate connection to BigIP",
                "[ERROR] boom",
            ]
        );
        assert_eq!(logger.messages(Level::Warn), vec!["Could not validate connection to BigIP"]);
    }

    #[test]
    fn init_can_be_called_twice() {
        init(tracing::Level::DEBUG);
        init(tracing::Level::INFO);
        TracingLogger.info("still logging");
    }
}
