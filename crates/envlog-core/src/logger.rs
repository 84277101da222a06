//! Builds a [`Logger`] from [`Settings`].
//!
//! Every value is resolved permissively: an unknown level means info, an
//! unknown format means plain text, and any output other than `FILE` means the
//! terminal. The only failure is a log file that cannot be opened.

use crate::error::Error;
use crate::format::{self, Format, RecordFormat};
use crate::level::Level;
use crate::settings::Settings;
use crate::sink::Sink;
use std::io::Write;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Output {
    Term,
    File,
}

impl Output {
    pub fn from_setting(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("FILE") {
            Output::File
        } else {
            Output::Term
        }
    }
}

/// Drops events more verbose than the configured level, fatal and panic
/// included, which the coarse `tracing` filter cannot tell apart from errors.
struct SeverityFilter {
    level: Level,
}

impl<S: Subscriber> Layer<S> for SeverityFilter {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        format::event_level(event) <= self.level
    }
}

/// A configured logging backend together with the settings it came from.
#[derive(Debug)]
pub struct Logger {
    settings: Settings,
    level: Level,
    format: Format,
    output: Output,
    sink: Sink,
    dispatch: Dispatch,
}

pub fn create_logger(settings: Settings) -> Result<Logger, Error> {
    Logger::from_settings(settings)
}

impl Logger {
    pub fn from_settings(settings: Settings) -> Result<Self, Error> {
        let output = Output::from_setting(settings.output());
        let sink = match output {
            Output::File => {
                Sink::file(settings.path()).map_err(|e| Error::io(settings.path(), e))?
            }
            Output::Term => Sink::stdout(),
        };
        Ok(Self::with_sink(settings, output, sink))
    }

    fn with_sink(settings: Settings, output: Output, sink: Sink) -> Self {
        let level = Level::from_setting(settings.level());
        let format = Format::from_setting(settings.format());

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(sink.clone())
            .event_format(RecordFormat::new(format));
        let subscriber = tracing_subscriber::registry()
            .with(level.as_filter())
            .with(SeverityFilter { level })
            .with(layer);

        Self {
            settings,
            level,
            format,
            output,
            sink,
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn output(&self) -> Output {
        self.output
    }

    /// The backend, for installing as a `tracing` default elsewhere.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Sends all further records to `writer` instead of the configured sink.
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) {
        self.sink.replace(writer);
    }

    /// Runs `f` with this logger as the thread's `tracing` subscriber, so plain
    /// `tracing` macros inside it (structured fields included) end up here.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn log(&self, level: Level, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        self.scope(|| emit(level, msg));
    }

    pub fn trace(&self, msg: &str) {
        self.log(Level::Trace, msg)
    }

    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg)
    }

    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg)
    }

    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg)
    }

    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg)
    }

    /// Logs at fatal level, then exits the process with status 1.
    pub fn fatal(&self, msg: &str) -> ! {
        self.log(Level::Fatal, msg);
        self.flush();
        std::process::exit(1)
    }

    /// Logs at panic level, then panics with `msg`.
    pub fn panic(&self, msg: &str) -> ! {
        self.log(Level::Panic, msg);
        self.flush();
        panic!("{}", msg)
    }

    fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("failed to flush log output: {}", e);
        }
    }
}

fn emit(level: Level, msg: &str) {
    let severity = level.as_str();
    match level {
        Level::Trace => tracing::trace!(envlog.severity = severity, "{}", msg),
        Level::Debug => tracing::debug!(envlog.severity = severity, "{}", msg),
        Level::Info => tracing::info!(envlog.severity = severity, "{}", msg),
        Level::Warn => tracing::warn!(envlog.severity = severity, "{}", msg),
        Level::Error | Level::Fatal | Level::Panic => {
            tracing::error!(envlog.severity = severity, "{}", msg)
        }
    }
}
