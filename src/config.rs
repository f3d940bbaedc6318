use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

/// Config file picked up from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "gateway.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid prediction backend url {url:?}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
}

/// Settings read once at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Default log filter (error, warn, info, debug, trace); RUST_LOG wins if set
    pub log_level: String,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base address of the prediction backend, e.g. http://127.0.0.1:5328
    pub base_url: String,
    /// Upper bound for one backend call, connect included
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Pause before the single retry of an idempotent prediction
    pub retry_delay_ms: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            source: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5328".to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 2_000,
            retry_delay_ms: 200,
            pool_max_idle_per_host: 8,
        }
    }
}

impl GatewayConfig {
    /// Defaults, then the config file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn load_with<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(CONFIG_PATH_ENV) {
            // An explicitly named file must exist
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(&env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("PREDICTION_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(host) = env("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env("GATEWAY_PORT") {
            self.server.port = parse_value("GATEWAY_PORT", &port)?;
        }
        if let Some(timeout) = env("GATEWAY_BACKEND_TIMEOUT_MS") {
            self.backend.timeout_ms = parse_value("GATEWAY_BACKEND_TIMEOUT_MS", &timeout)?;
        }
        if let Some(level) = env("GATEWAY_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.backend.base_url;
        let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidBackendUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backend.timeout_ms",
                value: "0".to_string(),
            });
        }
        if self.backend.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backend.connect_timeout_ms",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
