//! Server configuration.
//!
//! Loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;

use mercado_db::DbConfig;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// SQLite database file
    pub db_path: String,

    /// Connection pool upper bound
    pub db_max_connections: u32,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            db_path: "mercado.db".to_string(),
            db_max_connections: 5,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            bind_addr: match lookup("MERCADO_BIND_ADDR") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("MERCADO_BIND_ADDR".to_string()))?,
                None => defaults.bind_addr,
            },

            db_path: lookup("MERCADO_DB_PATH")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.db_path),

            db_max_connections: match lookup("MERCADO_DB_MAX_CONNECTIONS") {
                Some(value) => value.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue("MERCADO_DB_MAX_CONNECTIONS".to_string())
                })?,
                None => defaults.db_max_connections,
            },

            cors_origins: lookup("MERCADO_CORS_ORIGINS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MERCADO_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MERCADO_BIND_ADDR", "127.0.0.1:8080"),
            ("MERCADO_DB_PATH", "/var/lib/mercado/loja.db"),
            ("MERCADO_DB_MAX_CONNECTIONS", "8"),
            ("MERCADO_CORS_ORIGINS", "http://caixa.local, ,http://admin.local"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_path, "/var/lib/mercado/loja.db");
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(
            config.cors_origins,
            vec!["http://caixa.local", "http://admin.local"]
        );
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("MERCADO_BIND_ADDR", "not-an-addr")]),
            Err(ConfigError::InvalidValue(name)) if name == "MERCADO_BIND_ADDR"
        ));
        assert!(load(&[("MERCADO_DB_MAX_CONNECTIONS", "many")]).is_err());
        assert!(load(&[("MERCADO_DB_MAX_CONNECTIONS", "0")]).is_err());
    }
}
