use thiserror::Error;
use crate::types::balance::Balance;

#[derive(Error, Debug)]
pub enum Error {
    // Node Errors
    #[error("Ledger fetch unavailable: {reason}")]
    FetchUnavailable {
        reason: String,
    },

    #[error("Transfer submission failed (status={status:?}): {reason}")]
    SubmissionFailed {
        status: Option<u16>,
        reason: String,
    },

    // Ledger Errors
    #[error("Malformed ledger entry at block {block}{}: {reason}", describe_position(.position))]
    MalformedLedgerEntry {
        block: usize,
        position: Option<usize>,
        reason: String,
    },

    #[error("Reconciliation failed: expected={expected}, actual={actual}")]
    ReconciliationFailed {
        expected: Balance,
        actual: Balance,
    },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_position(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(", transaction {}", p),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_entry_message_names_position() {
        let err = Error::MalformedLedgerEntry {
            block: 2,
            position: Some(1),
            reason: "missing field `amount`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed ledger entry at block 2, transaction 1: missing field `amount`"
        );

        let err = Error::MalformedLedgerEntry {
            block: 0,
            position: None,
            reason: "block is not an object".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed ledger entry at block 0: block is not an object");
    }

    #[test]
    fn submission_failure_carries_status() {
        let err = Error::SubmissionFailed {
            status: Some(400),
            reason: "Missing values".to_string(),
        };
        assert_eq!(err.to_string(), "Transfer submission failed (status=Some(400)): Missing values");
    }
}
