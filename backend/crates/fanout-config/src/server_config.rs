use crate::{
    ConfigError, ConfigErrorResult, ConfigSection, DEFAULT_HOST, DEFAULT_PORT, MIN_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid(
                ConfigSection::Server,
                "server.host must not be empty",
            ));
        }

        // Port 0 means "auto-assign" - OS picks an available port.
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::invalid(
                ConfigSection::Server,
                format!(
                    "server.port must be 0 (auto) or >= {}, got {}",
                    MIN_PORT, self.port
                ),
            ));
        }

        Ok(())
    }

    /// Override host and port from a `host:port` string.
    ///
    /// An empty host (`":8080"`) means all interfaces (`0.0.0.0`).
    pub fn apply_addr(&mut self, addr: &str) -> ConfigErrorResult<()> {
        let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
            ConfigError::invalid(
                ConfigSection::Server,
                format!("listen address must be host:port, got '{}'", addr),
            )
        })?;

        let port = port.parse::<u16>().map_err(|_| {
            ConfigError::invalid(
                ConfigSection::Server,
                format!("invalid port in listen address '{}'", addr),
            )
        })?;

        self.host = match host.trim_start_matches('[').trim_end_matches(']') {
            "" => String::from(DEFAULT_HOST),
            host => host.to_string(),
        };
        self.port = port;

        Ok(())
    }
}
