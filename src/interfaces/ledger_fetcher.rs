use async_trait::async_trait;
use crate::error::Result;
use crate::ledger::block::{Block, LedgerSnapshot};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerFetcher: Send + Sync {
    /// Retrieve the node's current chain. Any failure is `Error::FetchUnavailable`.
    async fn fetch_ledger(&self) -> Result<LedgerSnapshot>;

    /// Retrieve only the chain tip.
    async fn fetch_last_block(&self) -> Result<Block>;
}
