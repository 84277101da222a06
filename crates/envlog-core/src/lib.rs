//! Process-wide logger configured from `LOG_LEVEL`, `LOG_FORMAT`,
//! `LOG_OUTPUT` and `LOG_PATH`, on top of `tracing`.

pub mod env_file;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod logging;
pub mod settings;
pub mod sink;

pub use error::{ConfigError, Error};
pub use format::Format;
pub use level::Level;
pub use logger::{create_logger, Logger, Output};
pub use settings::{load_settings, Settings, SettingsBuilder};
