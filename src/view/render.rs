use std::fmt::Write;
use crate::ledger::reconciliation::AccountView;
use crate::types::balance::Balance;
use crate::types::ids::AccountId;
use crate::view::pending::PendingTransfer;

pub const MINED_LABEL: &str = "mined";

/// Everything the terminal shows for one account.
#[derive(Debug)]
pub struct Screen<'a> {
    pub account: &'a AccountId,
    pub view: Option<&'a AccountView>,
    pub stale: bool,
    pub pending: Vec<&'a PendingTransfer>,
    pub projected_delta: Balance,
}

/// How an incoming sender is shown; issuance credit reads as "mined".
pub fn display_sender(sender: &AccountId) -> &str {
    if sender.is_issuance() {
        MINED_LABEL
    } else {
        sender.as_str()
    }
}

pub fn render_screen(screen: &Screen<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Wallet {}", screen.account);

    if screen.stale {
        let _ = writeln!(out, "! Ledger unavailable, data may be stale");
    }

    let Some(view) = screen.view else {
        let _ = writeln!(out, "No ledger loaded yet");
        render_pending(&mut out, screen);
        return out;
    };

    let _ = writeln!(out, "Balance: {}", view.balance);
    if !screen.pending.is_empty() {
        let _ = writeln!(
            out,
            "Projected balance (unconfirmed): {}",
            view.balance + screen.projected_delta
        );
    }

    let _ = writeln!(out, "Outgoing transactions:");
    if view.outgoing.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for tx in &view.outgoing {
        let _ = writeln!(out, "  Recipient: {}  Amount: {}", tx.recipient, tx.amount);
    }

    let _ = writeln!(out, "Incoming transactions:");
    if view.incoming.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for tx in &view.incoming {
        let _ = writeln!(out, "  Sender: {}  Amount: {}", display_sender(&tx.sender), tx.amount);
    }

    render_pending(&mut out, screen);
    out
}

fn render_pending(out: &mut String, screen: &Screen<'_>) {
    if screen.pending.is_empty() {
        return;
    }
    let _ = writeln!(out, "Pending (unconfirmed):");
    for p in &screen.pending {
        let block = p
            .receipt
            .expected_block
            .map(|b| format!(" -> block {}", b))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} -> {}  Amount: {}{}",
            p.request.sender, p.request.recipient, p.request.amount, block
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::block::{Block, LedgerSnapshot, Transaction};
    use crate::ledger::reconciliation::reconcile;

    #[test]
    fn issuance_sender_is_shown_as_mined() {
        assert_eq!(display_sender(&AccountId::from("0")), "mined");
        assert_eq!(display_sender(&AccountId::from("bob")), "bob");
    }

    #[test]
    fn renders_balance_and_history() {
        let ledger = LedgerSnapshot::new(vec![Block::with_transactions(vec![
            Transaction::new("0", "alice", 50),
            Transaction::new("alice", "bob", 20),
        ])]);
        let alice = AccountId::from("alice");
        let view = reconcile(&ledger, &alice);

        let text = render_screen(&Screen {
            account: &alice,
            view: Some(&view),
            stale: false,
            pending: Vec::new(),
            projected_delta: Balance::zero(),
        });

        assert!(text.contains("Balance: 30"));
        assert!(text.contains("Recipient: bob  Amount: 20"));
        assert!(text.contains("Sender: mined  Amount: 50"));
        assert!(!text.contains("stale"));
        assert!(!text.contains("Pending"));
    }

    #[test]
    fn stale_notice_without_view() {
        let alice = AccountId::from("alice");
        let text = render_screen(&Screen {
            account: &alice,
            view: None,
            stale: true,
            pending: Vec::new(),
            projected_delta: Balance::zero(),
        });
        assert!(text.contains("data may be stale"));
        assert!(text.contains("No ledger loaded yet"));
    }
}
