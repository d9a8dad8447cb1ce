pub mod ledger_fetcher;
pub mod payment_submitter;

pub use ledger_fetcher::LedgerFetcher;
pub use payment_submitter::{PaymentSubmitter, SubmissionReceipt, TransferRequest};
