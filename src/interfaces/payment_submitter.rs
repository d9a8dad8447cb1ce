use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::types::amount::Amount;
use crate::types::ids::AccountId;

/// Body of `POST /transactions/new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount: Amount,
}

/// Acknowledgement from the node. Acceptance is not inclusion: the transfer
/// only shows up once a block containing it is mined and fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: String,
    /// Block index the node promised to put the transfer in, when stated.
    pub expected_block: Option<u64>,
}

impl SubmissionReceipt {
    /// Build a receipt from the node's acknowledgement message, which reads
    /// "Transaction will be added to block N".
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let expected_block = message
            .split_whitespace()
            .last()
            .and_then(|word| word.trim_end_matches('.').parse::<u64>().ok());

        SubmissionReceipt {
            message,
            expected_block,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentSubmitter: Send + Sync {
    /// Failure is `Error::SubmissionFailed`; it never means the transfer happened.
    async fn submit(&self, request: &TransferRequest) -> Result<SubmissionReceipt>;
}
