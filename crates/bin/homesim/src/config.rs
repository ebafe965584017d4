//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homesim.toml` in the working directory unless another path
//! is given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values.

use std::path::Path;

use serde::Deserialize;

use homesim_domain::room::DEFAULT_ROOM_COUNT;

/// Default configuration file name.
pub const DEFAULT_PATH: &str = "homesim.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulation settings.
    pub simulation: SimulationConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Simulation settings that are not exposed as flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Rooms created when the store is empty.
    pub room_count: usize,
    /// RNG seed. `--seed` wins over this value.
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMESIM_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("HOMESIM_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("HOMESIM_ROOM_COUNT")
            && let Ok(count) = val.parse()
        {
            self.simulation.room_count = count;
        }
        if let Ok(val) = std::env::var("HOMESIM_SEED")
            && let Ok(seed) = val.parse()
        {
            self.simulation.seed = Some(seed);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        if self.simulation.room_count == 0 {
            return Err(ConfigError::Validation(
                "room count must be non-zero".to_string(),
            ));
        }
        if let Err(err) = tracing_subscriber::EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::Validation(format!(
                "invalid log filter `{}`: {err}",
                self.logging.filter
            )));
        }
        Ok(())
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:homesim.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homesim=info,homesim_app=info,homesim_adapter_storage_sqlite_sqlx=warn"
                .to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            seed: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:homesim.db?mode=rwc");
        assert_eq!(config.simulation.room_count, 5);
        assert_eq!(config.simulation.seed, None);
        assert!(config.logging.filter.contains("homesim=info"));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.simulation.room_count, 5);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [simulation]
            room_count = 8
            seed = 42
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database_url(), "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.simulation.room_count, 8);
        assert_eq!(config.simulation.seed, Some(42));
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [simulation]
            seed = 7
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.room_count, 5);
        assert_eq!(config.database.url, "sqlite:homesim.db?mode=rwc");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.simulation.room_count, 5);
    }

    #[test]
    fn should_reject_zero_room_count() {
        let mut config = Config::default();
        config.simulation.room_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_database_url() {
        let mut config = Config::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_unparsable_log_filter() {
        let mut config = Config::default();
        config.logging.filter = "homesim=loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
