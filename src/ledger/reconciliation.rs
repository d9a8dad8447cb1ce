use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::ledger::block::{LedgerSnapshot, Transaction};
use crate::types::balance::Balance;
use crate::types::ids::AccountId;

/// One account's balance and classified history, derived from a single
/// snapshot. Replaced wholesale by the next reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub account: AccountId,
    pub balance: Balance,
    /// Transactions credited to the account, oldest first.
    pub incoming: Vec<Transaction>,
    /// Transactions debited from the account, oldest first.
    pub outgoing: Vec<Transaction>,
}

impl AccountView {
    pub fn empty(account: AccountId) -> Self {
        AccountView {
            account,
            ..Default::default()
        }
    }

    pub fn total_received(&self) -> Balance {
        self.incoming.iter().map(|t| Balance::from(t.amount)).sum()
    }

    pub fn total_sent(&self) -> Balance {
        self.outgoing.iter().map(|t| Balance::from(t.amount)).sum()
    }

    /// Verify the balance against the lists it was folded from
    pub fn verify_consistency(&self) -> Result<()> {
        let expected = self.total_received() - self.total_sent();
        if self.balance != expected {
            return Err(Error::ReconciliationFailed {
                expected,
                actual: self.balance,
            });
        }
        Ok(())
    }

    pub fn has_activity(&self) -> bool {
        !self.incoming.is_empty() || !self.outgoing.is_empty()
    }
}

/// Replay `ledger` for `account`.
///
/// Credit and debit checks are independent, so a self-transfer lands in both
/// lists and nets to zero. Amounts are taken as-is; nothing about the ledger's
/// well-formedness is checked here.
pub fn reconcile(ledger: &LedgerSnapshot, account: &AccountId) -> AccountView {
    let _span = crate::observability::tracing::trace_reconciliation(account).entered();

    let mut balance = Balance::zero();
    let mut incoming = Vec::new();
    let mut outgoing = Vec::new();

    for transaction in ledger.transactions() {
        if &transaction.recipient == account {
            balance = balance.credit(transaction.amount);
            incoming.push(transaction.clone());
        }
        if &transaction.sender == account {
            balance = balance.debit(transaction.amount);
            outgoing.push(transaction.clone());
        }
    }

    tracing::debug!(
        blocks = ledger.len(),
        incoming = incoming.len(),
        outgoing = outgoing.len(),
        %balance,
        "Reconciled account"
    );

    AccountView {
        account: account.clone(),
        balance,
        incoming,
        outgoing,
    }
}
