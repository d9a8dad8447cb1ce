pub mod block;
pub mod decode;
pub mod reconciliation;

pub use block::{Block, LedgerSnapshot, Transaction};
pub use reconciliation::{reconcile, AccountView};
