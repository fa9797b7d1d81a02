use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, ConfigSection,
    DEFAULT_CONFIG_DIR, LoggingConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for FANOUT_CONFIG_DIR env var, else use ./.fanout/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply FANOUT_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: FANOUT_CONFIG_DIR env var > ./.fanout/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir().map_err(|_| {
            ConfigError::invalid(
                ConfigSection::Environment,
                "Cannot determine current working directory",
            )
        })?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.websocket.validate()?;

        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref filename) => {
                let log_dir = Self::config_dir()?.join(&self.logging.dir);
                Ok(Some(log_dir.join(filename)))
            }
            None => Ok(None),
        }
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        if self.server.host.contains(':') {
            format!("[{}]:{}", self.server.host, self.server.port)
        } else {
            format!("{}:{}", self.server.host, self.server.port)
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}", self.bind_addr());
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );

        let idle = if self.websocket.idle_timeout_secs == 0 {
            String::from("disabled")
        } else {
            format!("{}s", self.websocket.idle_timeout_secs)
        };
        info!(
            "  websocket: buffer={}, broadcast_queue={}, idle_timeout={}",
            self.websocket.send_buffer_size, self.websocket.broadcast_queue_capacity, idle
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("FANOUT_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("FANOUT_SERVER_PORT", &mut self.server.port);

        // Logging
        Self::apply_env_parse("FANOUT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("FANOUT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("FANOUT_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("FANOUT_LOG_DIR", &mut self.logging.dir);

        // WebSocket
        Self::apply_env_parse(
            "FANOUT_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "FANOUT_WS_BROADCAST_QUEUE_CAPACITY",
            &mut self.websocket.broadcast_queue_capacity,
        );
        Self::apply_env_parse(
            "FANOUT_WS_IDLE_TIMEOUT_SECS",
            &mut self.websocket.idle_timeout_secs,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
