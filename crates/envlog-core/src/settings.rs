//! Logger settings read from the environment.
//!
//! Values are kept exactly as found. Turning them into a level, a format and
//! an output is the job of [`crate::logger`], which never rejects a value.

use crate::env_file::EnvFile;
use crate::error::ConfigError;
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

pub const LEVEL_VAR: &str = "LOG_LEVEL";
pub const FORMAT_VAR: &str = "LOG_FORMAT";
pub const OUTPUT_VAR: &str = "LOG_OUTPUT";
pub const PATH_VAR: &str = "LOG_PATH";

pub const DEFAULT_LEVEL: &str = "DEBUG";
pub const DEFAULT_FORMAT: &str = "PLAIN";
pub const DEFAULT_OUTPUT: &str = "TERM";

#[derive(Builder, Debug, Clone, Eq, PartialEq)]
#[builder(default, setter(into))]
pub struct Settings {
    level: String,
    format: String,
    output: String,
    path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            path: String::new(),
        }
    }
}

impl Settings {
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Empty unless the output needs a file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolves the four variables through `lookup`.
    ///
    /// Missing level, format and output fall back to their defaults with a
    /// notice on stderr. A missing path is only fine when the output is the
    /// terminal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup(LEVEL_VAR).unwrap_or_else(|| {
            eprintln!("{} is not set, using {} for this run", LEVEL_VAR, DEFAULT_LEVEL);
            DEFAULT_LEVEL.to_string()
        });
        let format = lookup(FORMAT_VAR).unwrap_or_else(|| {
            eprintln!("{} is not set, using {}", FORMAT_VAR, DEFAULT_FORMAT);
            DEFAULT_FORMAT.to_string()
        });
        let output = lookup(OUTPUT_VAR).unwrap_or_else(|| {
            eprintln!("{} is not set, printing to the terminal", OUTPUT_VAR);
            DEFAULT_OUTPUT.to_string()
        });
        let path = match lookup(PATH_VAR) {
            Some(path) => path,
            None if output.trim().eq_ignore_ascii_case(DEFAULT_OUTPUT) => String::new(),
            None => return Err(ConfigError::MissingPath),
        };

        Ok(Self {
            level,
            format,
            output,
            path,
        })
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}={} {}={} {}={} {}={:?}",
            LEVEL_VAR, self.level, FORMAT_VAR, self.format, OUTPUT_VAR, self.output, PATH_VAR, self.path
        )
    }
}

/// Loads the discovered `.env` file, then reads the settings from the process environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&EnvFile::Discover)
}

pub fn load_settings_from(env_file: &EnvFile) -> Result<Settings, ConfigError> {
    env_file.load()?;
    Settings::from_lookup(|key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Output;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(settings.level(), "DEBUG");
        assert_eq!(settings.format(), "PLAIN");
        assert_eq!(settings.output(), "TERM");
        assert_eq!(settings.path(), "");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_values_are_kept_verbatim() {
        let settings = Settings::from_lookup(lookup_in(&[
            ("LOG_LEVEL", "Warning"),
            ("LOG_FORMAT", "json"),
            ("LOG_OUTPUT", "file"),
            ("LOG_PATH", "test.log"),
        ]))
        .unwrap();
        assert_eq!(settings.level(), "Warning");
        assert_eq!(settings.format(), "json");
        assert_eq!(settings.output(), "file");
        assert_eq!(settings.path(), "test.log");
    }

    #[test]
    fn test_file_output_requires_path() {
        let result = Settings::from_lookup(lookup_in(&[("LOG_OUTPUT", "FILE")]));
        assert!(matches!(result, Err(ConfigError::MissingPath)));
    }

    #[test]
    fn test_unrecognized_output_requires_path() {
        let result = Settings::from_lookup(lookup_in(&[("LOG_OUTPUT", "syslog")]));
        assert!(matches!(result, Err(ConfigError::MissingPath)));
    }

    #[test]
    fn test_terminal_output_does_not_need_path() {
        let settings = Settings::from_lookup(lookup_in(&[("LOG_OUTPUT", "term")])).unwrap();
        assert_eq!(settings.path(), "");
    }

    #[test]
    fn test_padded_terminal_output_matches_factory() {
        let settings = Settings::from_lookup(lookup_in(&[("LOG_OUTPUT", " term ")])).unwrap();
        assert_eq!(settings.output(), " term ");
        assert_eq!(settings.path(), "");
        assert_eq!(Output::from_setting(settings.output()), Output::Term);
    }

    #[test]
    fn test_builder_falls_back_to_defaults() {
        let settings = SettingsBuilder::default()
            .format("JSON")
            .build()
            .unwrap();
        assert_eq!(settings.level(), "DEBUG");
        assert_eq!(settings.format(), "JSON");
        assert_eq!(settings.output(), "TERM");
    }

    #[test]
    fn test_load_from_missing_env_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_settings_from(&EnvFile::Path(dir.path().join(".env")));
        assert!(matches!(result, Err(ConfigError::EnvFile(_))));
    }

    #[test]
    fn test_load_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ENVLOG_SETTINGS_TEST_MARKER=loaded").unwrap();

        let loaded = load_settings_from(&EnvFile::Path(file.path().to_path_buf()));
        assert_eq!(
            std::env::var("ENVLOG_SETTINGS_TEST_MARKER").as_deref(),
            Ok("loaded")
        );
        // the loaded settings are exactly what the environment resolves to afterwards
        let resolved = Settings::from_lookup(|key| std::env::var(key).ok());
        assert_eq!(format!("{:?}", loaded), format!("{:?}", resolved));
    }

    #[test]
    fn test_display_lists_every_variable() {
        let line = Settings::default().to_string();
        assert_eq!(
            line,
            "LOG_LEVEL=DEBUG LOG_FORMAT=PLAIN LOG_OUTPUT=TERM LOG_PATH=\"\""
        );
    }
}
