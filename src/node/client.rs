//! HTTP client for the ledger node.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/chain` | Full chain snapshot |
//! | GET    | `/last_block` | Chain tip |
//! | POST   | `/transactions/new` | Submit a transfer |

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::Instrument;
use crate::config::NodeConfig;
use crate::error::{Error, Result};
use crate::interfaces::ledger_fetcher::LedgerFetcher;
use crate::interfaces::payment_submitter::{PaymentSubmitter, SubmissionReceipt, TransferRequest};
use crate::ledger::block::{Block, LedgerSnapshot};
use crate::ledger::decode::{decode_block_strict, decode_chain, DecodeReport};
use crate::node::retry::{retry_send, retry_unsent, RetryPolicy};

#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: url::Url,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct NodeMessage {
    #[serde(default)]
    message: Option<String>,
}

impl NodeClient {
    pub fn new(config: &NodeConfig, retry: RetryPolicy) -> Result<Self> {
        let mut base_url = url::Url::parse(&config.base_url)
            .map_err(|e| Error::ConfigError(format!("invalid node url {:?}: {}", config.base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client init failed: {}", e)))?;

        Ok(NodeClient {
            http,
            base_url,
            retry,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::ConfigError(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;

        let resp = retry_send(&self.retry, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| Error::FetchUnavailable {
                reason: format!("GET /{}: {}", path, e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::FetchUnavailable {
                reason: format!("GET /{} returned {}: {}", path, status.as_u16(), body),
            });
        }

        resp.json::<Value>().await.map_err(|e| Error::FetchUnavailable {
            reason: format!("GET /{}: undecodable body: {}", path, e),
        })
    }

    /// Fetch the chain and keep the decode report, including skipped entries.
    pub async fn fetch_chain_report(&self) -> Result<DecodeReport> {
        let body = self.get_json("chain").await?;
        let report = decode_chain(&body)?;
        tracing::info!(
            blocks = report.snapshot.len(),
            transactions = report.snapshot.transaction_count(),
            skipped = report.skipped.len(),
            "Fetched ledger"
        );
        Ok(report)
    }
}

#[async_trait]
impl LedgerFetcher for NodeClient {
    async fn fetch_ledger(&self) -> Result<LedgerSnapshot> {
        Ok(self.fetch_chain_report().await?.snapshot)
    }

    async fn fetch_last_block(&self) -> Result<Block> {
        let body = self.get_json("last_block").await?;
        let raw = body.get("last_block").ok_or_else(|| Error::FetchUnavailable {
            reason: "response has no `last_block`".to_string(),
        })?;
        decode_block_strict(raw)
    }
}

#[async_trait]
impl PaymentSubmitter for NodeClient {
    async fn submit(&self, request: &TransferRequest) -> Result<SubmissionReceipt> {
        let span = crate::observability::tracing::trace_submission(&request.sender, &request.recipient);
        self.post_transfer(request).instrument(span).await
    }
}

impl NodeClient {
    async fn post_transfer(&self, request: &TransferRequest) -> Result<SubmissionReceipt> {
        let url = self.endpoint("transactions/new")?;

        let resp = retry_unsent(&self.retry, || self.http.post(url.clone()).json(request).send())
            .await
            .map_err(|e| {
                let reason = if e.is_connect() {
                    format!("node unreachable: {}", e)
                } else {
                    // The request may have landed; the node could still mine it.
                    tracing::warn!("No answer to transfer, outcome unknown: {e}");
                    format!("no answer from node, transfer may still be accepted: {}", e)
                };
                Error::SubmissionFailed { status: None, reason }
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<NodeMessage>(&body)
            .ok()
            .and_then(|m| m.message);

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Node rejected transfer");
            return Err(Error::SubmissionFailed {
                status: Some(status.as_u16()),
                reason: message.unwrap_or(body),
            });
        }

        let receipt = SubmissionReceipt::from_message(message.unwrap_or_default());
        tracing::info!(
            amount = %request.amount,
            expected_block = ?receipt.expected_block,
            "Transfer accepted"
        );
        Ok(receipt)
    }
}
