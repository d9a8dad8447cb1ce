//! Wallet client for a proof-of-work ledger node.
//!
//! The node is the only source of truth. The wallet fetches the whole chain,
//! replays it for one account ([`ledger::reconcile`]) and shows the balance
//! with incoming and outgoing history. Transfers are posted back to the node
//! and stay "pending" until a fetched chain catches up with them.

pub mod commands;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod ledger;
pub mod node;
pub mod observability;
pub mod types;
pub mod view;

pub use error::{Error, Result};
pub use ledger::{reconcile, AccountView, Block, LedgerSnapshot, Transaction};
pub use types::{AccountId, Amount, Balance, ISSUANCE_ACCOUNT};
