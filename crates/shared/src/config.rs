//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Period closure policy.
    #[serde(default)]
    pub closure: ClosureConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Period closure policy: thresholds classifying an account's closure status
/// by days elapsed since `last_closed_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosureConfig {
    /// An account is `current` if closed within this many days.
    #[serde(default = "default_current_within_days")]
    pub current_within_days: i64,
    /// An account is `recent` if closed within this many days (and not
    /// `current`); older closures are `outdated`.
    #[serde(default = "default_recent_within_days")]
    pub recent_within_days: i64,
}

fn default_current_within_days() -> i64 {
    45
}

fn default_recent_within_days() -> i64 {
    90
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            current_within_days: default_current_within_days(),
            recent_within_days: default_recent_within_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("IAFA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_defaults() {
        let closure = ClosureConfig::default();
        assert_eq!(closure.current_within_days, 45);
        assert_eq!(closure.recent_within_days, 90);
    }
}
