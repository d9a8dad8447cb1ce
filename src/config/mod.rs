use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::types::amount::Amount;

pub mod node;
pub mod loader;

pub use loader::AppConfig;
pub use node::{NodeConfig, RetryConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WalletConfig {
    pub default_amount: i64,
    pub poll_interval_secs: u64,
}

impl WalletConfig {
    pub fn default_amount(&self) -> Amount {
        Amount::from_i64(self.default_amount)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            default_amount: 1,  // one coin per send
            poll_interval_secs: 5,
        }
    }
}
