use serde::{Deserialize, Serialize};
use crate::types::amount::Amount;
use crate::types::ids::AccountId;

/// A transfer as recorded by the node. Never mutated once mined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount: Amount,
}

impl Transaction {
    pub fn new(sender: impl Into<AccountId>, recipient: impl Into<AccountId>, amount: i64) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: Amount::from_i64(amount),
        }
    }

    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.recipient
    }
}

/// A mined block. Transaction order is significant and preserved as stored.
///
/// The header fields are carried for display only; nothing in this crate
/// checks hashes or proofs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_hash: Option<serde_json::Value>,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Block {
            transactions,
            ..Default::default()
        }
    }
}

/// One fetched copy of the chain. Independent of every other snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    blocks: Vec<Block>,
}

impl LedgerSnapshot {
    pub fn new(blocks: Vec<Block>) -> Self {
        LedgerSnapshot { blocks }
    }

    pub fn empty() -> Self {
        LedgerSnapshot { blocks: Vec::new() }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Height of the chain as the node numbers it. Falls back to the block
    /// count when the node omits indices.
    pub fn height(&self) -> u64 {
        self.blocks
            .last()
            .and_then(|b| b.index)
            .unwrap_or(self.blocks.len() as u64)
    }

    /// Every transaction in replay order: blocks in snapshot order, then
    /// transactions in stored order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks.iter().flat_map(|b| b.transactions.iter())
    }

    pub fn transaction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.transactions.len()).sum()
    }
}

impl From<Vec<Block>> for LedgerSnapshot {
    fn from(blocks: Vec<Block>) -> Self {
        LedgerSnapshot::new(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_order_spans_blocks() {
        let snapshot = LedgerSnapshot::new(vec![
            Block::with_transactions(vec![
                Transaction::new("0", "bob", 10),
                Transaction::new("bob", "carol", 1),
            ]),
            Block::with_transactions(vec![]),
            Block::with_transactions(vec![Transaction::new("bob", "alice", 5)]),
        ]);

        let order: Vec<_> = snapshot
            .transactions()
            .map(|t| t.recipient.as_str().to_string())
            .collect();
        assert_eq!(order, vec!["bob", "carol", "alice"]);
        assert_eq!(snapshot.transaction_count(), 3);
    }

    #[test]
    fn height_prefers_node_index() {
        let mut tip = Block::with_transactions(vec![]);
        tip.index = Some(7);
        let snapshot = LedgerSnapshot::new(vec![Block::default(), tip]);
        assert_eq!(snapshot.height(), 7);

        let snapshot = LedgerSnapshot::new(vec![Block::default(), Block::default()]);
        assert_eq!(snapshot.height(), 2);
        assert_eq!(LedgerSnapshot::empty().height(), 0);
    }
}
