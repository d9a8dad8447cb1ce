//! Transfers the node has accepted but that are not yet in a fetched block.
//!
//! Kept apart from `AccountView`: a pending entry never changes a reconciled
//! balance, it is only shown next to it as unconfirmed.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::interfaces::payment_submitter::{SubmissionReceipt, TransferRequest};
use crate::ledger::block::LedgerSnapshot;
use crate::types::balance::Balance;
use crate::types::ids::AccountId;

#[derive(Clone, Debug, PartialEq)]
pub struct PendingTransfer {
    pub id: Uuid,
    pub request: TransferRequest,
    pub receipt: SubmissionReceipt,
    pub submitted_at: DateTime<Utc>,
}

impl PendingTransfer {
    /// Signed effect on `account` if the transfer is mined.
    pub fn effect_on(&self, account: &AccountId) -> Balance {
        let mut effect = Balance::zero();
        if &self.request.recipient == account {
            effect = effect.credit(self.request.amount);
        }
        if &self.request.sender == account {
            effect = effect.debit(self.request.amount);
        }
        effect
    }

    pub fn involves(&self, account: &AccountId) -> bool {
        &self.request.sender == account || &self.request.recipient == account
    }

    /// A snapshot has caught up with this transfer once it reaches the block
    /// the node promised. Without a promise, any newer snapshot counts.
    fn is_covered_by(&self, snapshot: &LedgerSnapshot) -> bool {
        match self.receipt.expected_block {
            Some(block) => snapshot.height() >= block,
            None => true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PendingTransfers {
    entries: Vec<PendingTransfer>,
    /// Highest chain height seen in a settled snapshot.
    high_water: u64,
}

impl PendingTransfers {
    pub fn new() -> Self {
        PendingTransfers {
            entries: Vec::new(),
            high_water: 0,
        }
    }

    pub fn record(&mut self, request: TransferRequest, receipt: SubmissionReceipt) -> &PendingTransfer {
        self.entries.push(PendingTransfer {
            id: Uuid::new_v4(),
            request,
            receipt,
            submitted_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Drop every entry `snapshot` has caught up with. Returns how many were dropped.
    ///
    /// A chain shorter than one already seen means the node was reset and
    /// its promised block numbers no longer apply, so everything is dropped.
    pub fn settle(&mut self, snapshot: &LedgerSnapshot) -> usize {
        let before = self.entries.len();
        let height = snapshot.height();
        if height < self.high_water {
            tracing::warn!(
                height,
                previous = self.high_water,
                dropped = before,
                "Chain height went backwards, dropping pending transfers"
            );
            self.entries.clear();
        } else {
            self.entries.retain(|p| !p.is_covered_by(snapshot));
        }
        self.high_water = height;
        let settled = before - self.entries.len();
        if settled > 0 {
            tracing::debug!(settled, remaining = self.entries.len(), "Settled pending transfers");
        }
        settled
    }

    pub fn for_account<'a>(&'a self, account: &'a AccountId) -> impl Iterator<Item = &'a PendingTransfer> + 'a {
        self.entries.iter().filter(move |p| p.involves(account))
    }

    /// Net unconfirmed effect on `account`.
    pub fn projected_delta(&self, account: &AccountId) -> Balance {
        self.for_account(account).map(|p| p.effect_on(account)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
