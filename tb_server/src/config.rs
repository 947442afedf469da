//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use table_booking::{
    auth::ApiKey,
    db::{DatabaseConfig, InvalidEnvVar},
};

/// Default listen address
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8000));

/// Minimum accepted API key length
pub const MIN_API_KEY_LEN: usize = 12;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Insert the demo tables when the database has none
    pub seed_demo_tables: bool,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared secret expected in the `x-api-key` header (required)
    pub api_key: ApiKey,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `seed_override` - Force demo seeding on (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        seed_override: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(addr) => addr,
            None => env_var("SERVER_BIND", "IP:PORT address")?.unwrap_or(DEFAULT_BIND),
        };

        let mut database = DatabaseConfig::from_env()?;
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        // Security configuration (REQUIRED)
        let api_key = std::env::var("API_KEY").map_err(|_| ConfigError::MissingRequired {
            var: "API_KEY".to_string(),
            hint: "Generate with: openssl rand -hex 24".to_string(),
        })?;

        if api_key.len() < MIN_API_KEY_LEN {
            return Err(ConfigError::Invalid {
                var: "API_KEY".to_string(),
                reason: format!("Must be at least {MIN_API_KEY_LEN} characters"),
            });
        }

        let seed_demo_tables = seed_override
            || env_var("SEED_DEMO_TABLES", "boolean (true or false)")?.unwrap_or(false);
        let metrics_bind = env_var("METRICS_BIND", "IP:PORT address")?;

        Ok(ServerConfig {
            bind,
            database,
            security: SecurityConfig {
                api_key: ApiKey::new(api_key),
            },
            seed_demo_tables,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.security.api_key.len() < MIN_API_KEY_LEN {
            return Err(ConfigError::Invalid {
                var: "API_KEY".to_string(),
                reason: format!("Must be at least {MIN_API_KEY_LEN} characters"),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: "Must differ from SERVER_BIND".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl From<InvalidEnvVar> for ConfigError {
    fn from(err: InvalidEnvVar) -> Self {
        ConfigError::Invalid {
            reason: format!("'{}' is not a valid number", err.value),
            var: err.var,
        }
    }
}

/// Read an optional variable from the process environment
fn env_var<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    parse_var(key, std::env::var(key).ok(), expected)
}

/// Unset is `None`; set-but-unparseable is an error
fn parse_var<T: FromStr>(
    key: &str,
    raw: Option<String>,
    expected: &str,
) -> Result<Option<T>, ConfigError> {
    match raw {
        Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{raw}' is not a valid {expected}"),
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            database: DatabaseConfig {
                database_url: "test".to_string(),
                max_connections: 10,
                min_connections: 1,
                connection_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            security: SecurityConfig {
                api_key: ApiKey::new("a".repeat(MIN_API_KEY_LEN)),
            },
            seed_demo_tables: false,
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "API_KEY".to_string(),
            hint: "Use openssl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("API_KEY"));
        assert!(msg.contains("Use openssl"));
    }

    #[test]
    fn test_default_bind() {
        assert_eq!(DEFAULT_BIND, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_unset_variable_is_none() {
        let seed: Option<bool> = parse_var("SEED_DEMO_TABLES", None, "boolean").unwrap();
        assert_eq!(seed, None);
    }

    #[test]
    fn test_boolean_flag_parses() {
        let seed: Option<bool> =
            parse_var("SEED_DEMO_TABLES", Some("true".to_string()), "boolean").unwrap();
        assert_eq!(seed, Some(true));
    }

    #[test]
    fn test_unparseable_boolean_is_rejected() {
        let err = parse_var::<bool>("SEED_DEMO_TABLES", Some("yes".to_string()), "boolean")
            .unwrap_err();

        match err {
            ConfigError::Invalid { var, reason } => {
                assert_eq!(var, "SEED_DEMO_TABLES");
                assert!(reason.contains("'yes'"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_address_is_rejected() {
        let err = parse_var::<SocketAddr>(
            "SERVER_BIND",
            Some("localhost".to_string()),
            "IP:PORT address",
        )
        .unwrap_err();
        assert!(err.to_string().contains("SERVER_BIND"));
    }

    #[test]
    fn test_unparseable_pool_size_becomes_config_error() {
        let err: ConfigError = DatabaseConfig::from_lookup(|key| {
            (key == "DB_MAX_CONNECTIONS").then(|| "abc".to_string())
        })
        .unwrap_err()
        .into();

        match err {
            ConfigError::Invalid { var, reason } => {
                assert_eq!(var, "DB_MAX_CONNECTIONS");
                assert!(reason.contains("'abc'"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_pool_bounds() {
        let mut config = config();
        config.database.min_connections = 20;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        config.database.min_connections = 0;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = config();
        config.security.api_key = ApiKey::new("short");

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_config_validation_metrics_port_clash() {
        let mut config = config();
        config.metrics_bind = Some(config.bind);
        assert!(config.validate().is_err());
    }
}
