use std::path::PathBuf;

use mathtutor_understanding::{DEFAULT_API_BASE, DEFAULT_MODEL};
use serde::Deserialize;

/// mathtutor runtime configuration.
///
/// The credential is deliberately absent: it is typed in per session.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL; requests go to `{api_base}/chat/completions`
    pub api_base: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Directory for rolling JSON logs
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_base: non_empty("MATHTUTOR_API_BASE").unwrap_or(defaults.api_base),
            model: non_empty("MATHTUTOR_MODEL").unwrap_or(defaults.model),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: non_empty("MATHTUTOR_LOG_DIR").map(PathBuf::from),
        }
    }
}
