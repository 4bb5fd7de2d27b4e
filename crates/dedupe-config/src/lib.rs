mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod threshold_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use threshold_config::ThresholdConfig;

const DEFAULT_DATABASE_FILENAME: &str = "dedupe.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_MIN_ISSUES: i64 = 5;
const DEFAULT_MIN_POINTS: i64 = 100;
const DEFAULT_RECENT_LOGIN_DAYS: i64 = 30;
