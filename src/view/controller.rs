//! Drives fetch -> reconcile -> render for one account at a time.
//!
//! Every refresh is stamped with a sequence number when it starts. Only the
//! most recently started refresh may replace the view; results of older ones
//! are dropped when they arrive, whatever order they complete in.

use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;
use crate::error::{Error, Result};
use crate::interfaces::ledger_fetcher::LedgerFetcher;
use crate::interfaces::payment_submitter::{PaymentSubmitter, TransferRequest};
use crate::ledger::block::LedgerSnapshot;
use crate::ledger::reconciliation::{reconcile, AccountView};
use crate::types::amount::Amount;
use crate::types::ids::AccountId;
use crate::view::pending::{PendingTransfer, PendingTransfers};
use crate::view::render::Screen;

/// Identifies one started refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// The view was replaced from the new snapshot.
    Applied,
    /// A newer refresh was started after this one; its result was ignored.
    Superseded,
    /// The fetch failed; the previous view is kept and marked stale.
    Unavailable(Error),
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied)
    }
}

pub struct ViewController {
    fetcher: Arc<dyn LedgerFetcher>,
    submitter: Arc<dyn PaymentSubmitter>,
    account: AccountId,
    issued_seq: u64,
    snapshot: Option<Arc<LedgerSnapshot>>,
    view: Option<AccountView>,
    stale: bool,
    pending: PendingTransfers,
}

impl ViewController {
    pub fn new(
        fetcher: Arc<dyn LedgerFetcher>,
        submitter: Arc<dyn PaymentSubmitter>,
        account: AccountId,
    ) -> Self {
        ViewController {
            fetcher,
            submitter,
            account,
            issued_seq: 0,
            snapshot: None,
            view: None,
            stale: false,
            pending: PendingTransfers::new(),
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn view(&self) -> Option<&AccountView> {
        self.view.as_ref()
    }

    pub fn snapshot(&self) -> Option<&LedgerSnapshot> {
        self.snapshot.as_deref()
    }

    /// True when the last refresh failed and the view predates it.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn pending(&self) -> &PendingTransfers {
        &self.pending
    }

    /// Switch accounts. The previous view is discarded; if a snapshot is
    /// cached it is replayed for the new account straight away. The returned
    /// ticket should be used to fetch a fresh snapshot.
    pub fn set_account(&mut self, account: AccountId) -> FetchTicket {
        tracing::info!(from = %self.account, to = %account, "Account changed");
        self.account = account;
        self.view = self
            .snapshot
            .as_deref()
            .map(|snapshot| reconcile(snapshot, &self.account));
        self.begin_refresh()
    }

    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        FetchTicket { seq: self.issued_seq }
    }

    /// Future that fetches a snapshot for `ticket`. It owns everything it
    /// needs, so it can be spawned while the controller keeps handling input.
    pub fn fetch_for(
        &self,
        ticket: FetchTicket,
    ) -> impl Future<Output = (FetchTicket, Result<LedgerSnapshot>)> + Send + use<> {
        let fetcher = Arc::clone(&self.fetcher);
        let span = crate::observability::tracing::trace_fetch(ticket.seq);
        async move {
            let result = fetcher.fetch_ledger().await;
            (ticket, result)
        }
        .instrument(span)
    }

    /// Apply the result of the refresh identified by `ticket`.
    pub fn complete_refresh(
        &mut self,
        ticket: FetchTicket,
        result: Result<LedgerSnapshot>,
    ) -> RefreshOutcome {
        if ticket.seq < self.issued_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued_seq,
                "Discarding superseded ledger fetch"
            );
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(snapshot) => {
                let view = reconcile(&snapshot, &self.account);
                if let Err(e) = view.verify_consistency() {
                    // Only reachable when the fold saturated.
                    tracing::warn!("{}", e);
                }
                self.pending.settle(&snapshot);
                self.snapshot = Some(Arc::new(snapshot));
                self.view = Some(view);
                self.stale = false;
                RefreshOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, "Keeping previous view: {}", e);
                self.stale = true;
                RefreshOutcome::Unavailable(e)
            }
        }
    }

    /// Start a refresh, wait for it, and apply it.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let (ticket, result) = self.fetch_for(ticket).await;
        self.complete_refresh(ticket, result)
    }

    /// Send `amount` from the current account to `recipient`.
    ///
    /// On acceptance the transfer is tracked as pending; the reconciled view
    /// is left untouched. On failure nothing is recorded.
    pub async fn submit_payment(
        &mut self,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<&PendingTransfer> {
        let request = TransferRequest {
            sender: self.account.clone(),
            recipient,
            amount,
        };

        let receipt = self.submitter.submit(&request).await?;
        Ok(self.pending.record(request, receipt))
    }

    /// Tip of the node's chain, bypassing the snapshot cache.
    pub async fn chain_tip(&self) -> Result<crate::ledger::block::Block> {
        self.fetcher.fetch_last_block().await
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen {
            account: &self.account,
            view: self.view.as_ref(),
            stale: self.stale,
            pending: self.pending.for_account(&self.account).collect(),
            projected_delta: self.pending.projected_delta(&self.account),
        }
    }
}
