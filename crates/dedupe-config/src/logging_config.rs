use crate::{DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_LEVEL_STRING, LogLevel};

use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub colored: bool,
    /// Log file name inside `dir`. None = stdout.
    pub file: Option<String>,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            // FromStr never fails for LogLevel
            level: LogLevel::from_str(DEFAULT_LOG_LEVEL_STRING).unwrap(),
            colored: true,
            file: None,
            dir: String::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}
