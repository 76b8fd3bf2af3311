//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, logging and speech settings for front ends.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution never fails; invalid values surface when they are used.

use crate::logging::default_log_level;
use crate::speech::capability::DEFAULT_SPEECH_LANGUAGE;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NOTECARDS_DB_PATH";
pub const ENV_LOG_DIR: &str = "NOTECARDS_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "NOTECARDS_LOG_LEVEL";
pub const ENV_SPEECH_LANG: &str = "NOTECARDS_SPEECH_LANG";

const DEFAULT_DB_FILE_NAME: &str = "notecards.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding the local storage table.
    pub db_path: PathBuf,
    /// Log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub speech_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            speech_language: read(ENV_SPEECH_LANG).unwrap_or(defaults.speech_language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_SPEECH_LANG};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert!(config.db_path.ends_with("notecards.sqlite3"));
        assert_eq!(config.speech_language, "pt-BR");
    }

    #[test]
    fn reads_and_trims_variables() {
        let vars = HashMap::from([
            (ENV_DB_PATH, " /data/notes.db "),
            (ENV_LOG_DIR, "/var/log/notecards"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_SPEECH_LANG, "en-US"),
        ]);
        let config = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/data/notes.db"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/notecards")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.speech_language, "en-US");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(|name| {
            (name == ENV_LOG_DIR || name == ENV_LOG_LEVEL).then(|| "   ".to_string())
        });
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, AppConfig::default().log_level);
    }
}
