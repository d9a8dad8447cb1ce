use std::path::Path;
use crate::config::*;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/default";
pub const ENV_PREFIX: &str = "WALLET";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// Layer built-in defaults, the optional config file, then `WALLET__*`
    /// environment variables. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let config = Self::defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let node = NodeConfig::default();
        let retry = RetryConfig::default();
        let wallet = WalletConfig::default();

        Config::builder()
            .set_default("node.base_url", node.base_url)
            .and_then(|b| b.set_default("node.timeout_secs", node.timeout_secs as i64))
            .and_then(|b| b.set_default("retry.max_retries", retry.max_retries as i64))
            .and_then(|b| b.set_default("retry.base_delay_ms", retry.base_delay_ms as i64))
            .and_then(|b| b.set_default("wallet.default_amount", wallet.default_amount))
            .and_then(|b| b.set_default("wallet.poll_interval_secs", wallet.poll_interval_secs as i64))
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Apply a `--node` override from the command line.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.node.base_url = url;
        }
        self
    }
}
