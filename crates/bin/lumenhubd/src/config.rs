//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `lumenhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use lumenhub_domain::transition::{DEFAULT_NUM_PERIODS, DEFAULT_PERIOD_MS, TransitionDefaults};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Timing used when a request leaves it out.
    pub transitions: TransitionsConfig,
    /// State change fan-out.
    pub events: EventsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TransitionsConfig {
    /// Delay between two ticks, in milliseconds.
    pub default_period_ms: u64,
    /// Tick count when neither duration nor period is given.
    pub default_num_periods: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast buffer size; slower SSE clients skip changes beyond it.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from `lumenhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lumenhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LUMENHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("LUMENHUB_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("LUMENHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("LUMENHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("LUMENHUB_TRANSITION_PERIOD_MS")
            && let Ok(period) = val.parse()
        {
            self.transitions.default_period_ms = period;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.transitions.default_period_ms == 0 {
            return Err(ConfigError::Validation(
                "transitions.default_period_ms must be non-zero".to_string(),
            ));
        }
        if self.transitions.default_num_periods == 0 {
            return Err(ConfigError::Validation(
                "transitions.default_num_periods must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn transition_defaults(&self) -> TransitionDefaults {
        TransitionDefaults {
            period_ms: self.transitions.default_period_ms,
            num_periods: self.transitions.default_num_periods,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lumenhubd=info,lumenhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for TransitionsConfig {
    fn default() -> Self {
        Self {
            default_period_ms: DEFAULT_PERIOD_MS,
            default_num_periods: DEFAULT_NUM_PERIODS,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 256 }
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
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.transitions.default_period_ms, 225);
        assert_eq!(config.transitions.default_num_periods, 20);
        assert_eq!(config.events.capacity, 256);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'

            [transitions]
            default_period_ms = 100
            default_num_periods = 10

            [events]
            capacity = 32
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.transition_defaults(),
            TransitionDefaults {
                period_ms: 100,
                num_periods: 10,
            }
        );
        assert_eq!(config.events.capacity, 32);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_default_period() {
        let mut config = Config::default();
        config.transitions.default_period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_default_period_count() {
        let mut config = Config::default();
        config.transitions.default_num_periods = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [transitions]
            default_period_ms = 50
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transitions.default_period_ms, 50);
        assert_eq!(config.transitions.default_num_periods, 20);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
