use crate::error::ConfigError;
use std::path::PathBuf;

/// Where the `.env` file that seeds the process environment comes from.
///
/// Variables already present in the environment win over the file.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum EnvFile {
    /// `.env` in the current directory or the closest ancestor that has one.
    #[default]
    Discover,
    Path(PathBuf),
}

impl EnvFile {
    pub fn load(&self) -> Result<(), ConfigError> {
        match self {
            EnvFile::Discover => {
                dotenv::dotenv()?;
            }
            EnvFile::Path(path) => dotenv::from_path(path)?,
        }
        Ok(())
    }
}
