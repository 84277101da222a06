use std::fmt::{Display, Formatter};
use tracing::level_filters::LevelFilter;

/// Severity of a record, most severe first.
///
/// A logger configured at some level emits every record whose level is less
/// than or equal to it, so `Level::Warn` lets `Warn`, `Error`, `Fatal` and
/// `Panic` through.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    Panic,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    /// Maps a raw `LOG_LEVEL` value onto a level. Unrecognized values map to `Info`.
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Level::Trace,
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARN" | "WARNING" => Level::Warn,
            "ERROR" => Level::Error,
            "FATAL" => Level::Fatal,
            "PANIC" => Level::Panic,
            _ => Level::Info,
        }
    }

    /// Exact inverse of [`Level::as_str`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "panic" => Some(Level::Panic),
            "fatal" => Some(Level::Fatal),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            "trace" => Some(Level::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    /// The closest `tracing` filter. `tracing` stops at `ERROR`, so fatal and
    /// panic share it and the logger does the finer check itself.
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            Level::Panic | Level::Fatal | Level::Error => LevelFilter::ERROR,
            Level::Warn => LevelFilter::WARN,
            Level::Info => LevelFilter::INFO,
            Level::Debug => LevelFilter::DEBUG,
            Level::Trace => LevelFilter::TRACE,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            _ => Level::Trace,
        }
    }
}
