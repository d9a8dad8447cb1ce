//! Lenient decoding of the node's `/chain` payload.
//!
//! A block or transaction that does not match the expected shape is skipped
//! and reported, so one bad entry never hides the rest of the history.

use serde_json::Value;
use crate::error::{Error, Result};
use crate::ledger::block::{Block, LedgerSnapshot, Transaction};

/// Result of decoding one chain payload.
#[derive(Debug)]
pub struct DecodeReport {
    pub snapshot: LedgerSnapshot,
    /// Length advertised by the node, if any.
    pub advertised_length: Option<u64>,
    /// Entries left out of the snapshot, each an `Error::MalformedLedgerEntry`.
    pub skipped: Vec<Error>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Decode a `{ "chain": [...], "length": n }` body.
///
/// Fails only when the envelope itself is unusable.
pub fn decode_chain(body: &Value) -> Result<DecodeReport> {
    let chain = body
        .get("chain")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::FetchUnavailable {
            reason: "response has no `chain` array".to_string(),
        })?;

    let advertised_length = body.get("length").and_then(Value::as_u64);

    let mut blocks = Vec::with_capacity(chain.len());
    let mut skipped = Vec::new();

    for (block_pos, raw_block) in chain.iter().enumerate() {
        if let Some(block) = decode_block(block_pos, raw_block, &mut skipped) {
            blocks.push(block);
        }
    }

    for err in &skipped {
        tracing::warn!("Skipping {}", err);
    }

    if let Some(length) = advertised_length {
        if length != chain.len() as u64 {
            tracing::warn!(
                advertised = length,
                received = chain.len(),
                "Chain length mismatch in node response"
            );
        }
    }

    Ok(DecodeReport {
        snapshot: LedgerSnapshot::new(blocks),
        advertised_length,
        skipped,
    })
}

/// Decode a single block value, e.g. the body of `/last_block`.
pub fn decode_block_strict(raw: &Value) -> Result<Block> {
    let mut skipped = Vec::new();
    let block = decode_block(0, raw, &mut skipped);
    match (block, skipped.into_iter().next()) {
        (Some(block), None) => Ok(block),
        (_, Some(err)) => Err(err),
        (None, None) => Err(Error::MalformedLedgerEntry {
            block: 0,
            position: None,
            reason: "block could not be decoded".to_string(),
        }),
    }
}

fn decode_block(block_pos: usize, raw: &Value, skipped: &mut Vec<Error>) -> Option<Block> {
    let Some(obj) = raw.as_object() else {
        skipped.push(malformed(block_pos, None, "block is not an object"));
        return None;
    };

    let Some(raw_txs) = obj.get("transactions").and_then(Value::as_array) else {
        skipped.push(malformed(block_pos, None, "block has no `transactions` array"));
        return None;
    };

    let mut transactions = Vec::with_capacity(raw_txs.len());
    for (tx_pos, raw_tx) in raw_txs.iter().enumerate() {
        match serde_json::from_value::<Transaction>(raw_tx.clone()) {
            Ok(tx) => transactions.push(tx),
            Err(e) => skipped.push(malformed(block_pos, Some(tx_pos), &e.to_string())),
        }
    }

    Some(Block {
        index: obj.get("index").and_then(Value::as_u64),
        timestamp: obj.get("timestamp").and_then(Value::as_f64),
        proof: obj.get("proof").cloned(),
        previous_hash: obj.get("previous_hash").cloned(),
        transactions,
    })
}

fn malformed(block: usize, position: Option<usize>, reason: &str) -> Error {
    Error::MalformedLedgerEntry {
        block,
        position,
        reason: reason.to_string(),
    }
}
