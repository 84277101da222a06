use crate::error::Error;
use crate::logger::Logger;
use crate::settings;
use once_cell::sync::{Lazy, OnceCell};

// Built on first access. A failure is kept as well, so it is never retried.
static INSTANCE: Lazy<Result<Logger, Error>> = Lazy::new(|| {
    let settings = settings::load_settings()?;
    Logger::from_settings(settings)
});

static GLOBAL: OnceCell<()> = OnceCell::new();

/// The process-wide logger, created from the environment on first use.
///
/// Concurrent first callers block until the single attempt finishes and all
/// see its outcome.
pub fn instance() -> Result<&'static Logger, Error> {
    INSTANCE.as_ref().map_err(Clone::clone)
}

/// Like [`instance`], and also makes the logger the global `tracing`
/// subscriber so `tracing` macros anywhere in the process reach it.
pub fn setup() -> Result<&'static Logger, Error> {
    let logger = instance()?;
    GLOBAL.get_or_init(|| {
        if tracing::dispatcher::set_global_default(logger.dispatch().clone()).is_err() {
            eprintln!("a global tracing subscriber is already installed");
        }
    });
    Ok(logger)
}
