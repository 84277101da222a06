use std::path::PathBuf;
use std::sync::Arc;

/// Problems with the logging configuration itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load environment file: {0}")]
    EnvFile(#[source] Arc<dotenv::Error>),
    #[error("could not create logger, missing log path")]
    MissingPath,
}

/// Everything that can stop a logger from being built.
///
/// The singleton caches the outcome of its only attempt, so the error is
/// `Clone` and shared sources live behind an `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}

impl From<dotenv::Error> for ConfigError {
    fn from(e: dotenv::Error) -> Self {
        ConfigError::EnvFile(Arc::new(e))
    }
}
