use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::types::ids::AccountId;

/// Install the global subscriber. `verbosity` follows the `-v` count; a
/// `RUST_LOG` value overrides it.
pub fn init_tracing(verbosity: u8, json: bool) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

pub fn trace_reconciliation(account: &AccountId) -> Span {
    tracing::debug_span!(
        "reconciliation",
        account = %account,
    )
}

pub fn trace_fetch(seq: u64) -> Span {
    tracing::info_span!(
        "ledger_fetch",
        seq = seq,
    )
}

pub fn trace_submission(sender: &AccountId, recipient: &AccountId) -> Span {
    tracing::info_span!(
        "transfer_submission",
        sender = %sender,
        recipient = %recipient,
    )
}
