/*
 * Responsibility
 * - 設定の読み込み (YAML ファイル → .env → 環境変数 の順に上書き)
 * - 設定値のバリデーション (API key / secret が空なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 9998;
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    // Expected `aud` of every session token
    pub shopify_api_key: String,
    // HS256 key for session tokens
    shopify_api_secret: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("shopify_api_key", &self.shopify_api_key)
            .field("shopify_api_secret", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration for the server.
    ///
    /// `config_path` falls back to `config/config.yaml` when that file exists.
    /// Environment variables (`PORT`, `SHOPIFY_API_KEY`, `SHOPIFY_API_SECRET`,
    /// optionally via `.env`) override file values.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = match config_path {
            Some(path) => ConfigSource::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                ConfigSource::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => ConfigSource::default(),
        };

        source.merge_env(|key| std::env::var(key).ok()).validate()
    }

    pub fn shopify_api_secret(&self) -> &str {
        &self.shopify_api_secret
    }
}

/// Raw, unvalidated settings as they come from the config file / environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigSource {
    pub port: Option<PortValue>,
    pub shopify_api_key: Option<String>,
    pub shopify_api_secret: Option<String>,
}

/// `port` may be written as `9998` or `"9998"` in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Text(String),
}

impl PortValue {
    fn into_text(self) -> String {
        match self {
            PortValue::Number(n) => n.to_string(),
            PortValue::Text(s) => s,
        }
    }
}

impl ConfigSource {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to `()` rather than a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Override file values with whatever `lookup` returns for the env keys.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("PORT") {
            self.port = Some(PortValue::Text(port));
        }
        if let Some(key) = lookup("SHOPIFY_API_KEY") {
            self.shopify_api_key = Some(key);
        }
        if let Some(secret) = lookup("SHOPIFY_API_SECRET") {
            self.shopify_api_secret = Some(secret);
        }
        self
    }

    pub fn validate(self) -> Result<Config, ConfigError> {
        let port = self
            .port
            .map(PortValue::into_text)
            .unwrap_or_default()
            .trim()
            .to_string();

        let port: u16 = if port.is_empty() {
            DEFAULT_PORT
        } else {
            port.parse().map_err(|_| ConfigError::Invalid("PORT"))?
        };

        let shopify_api_key = self.shopify_api_key.unwrap_or_default().trim().to_string();
        if shopify_api_key.is_empty() {
            return Err(ConfigError::Missing("SHOPIFY_API_KEY"));
        }

        let shopify_api_secret = self
            .shopify_api_secret
            .unwrap_or_default()
            .trim()
            .to_string();
        if shopify_api_secret.is_empty() {
            return Err(ConfigError::Missing("SHOPIFY_API_SECRET"));
        }

        Ok(Config {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            shopify_api_key,
            shopify_api_secret,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(api_key: &str, api_secret: &str) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            shopify_api_key: api_key.to_string(),
            shopify_api_secret: api_secret.to_string(),
        }
    }
}
