use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chain_wallet::commands::{run_balance, run_send, run_shell, run_status, run_watch};
use chain_wallet::config::AppConfig;
use chain_wallet::observability::tracing::init_tracing;
use chain_wallet::types::{AccountId, Amount};

/// Terminal wallet for a ledger node: balance, history and transfers.
#[derive(Parser, Debug)]
#[command(name = "chain-wallet", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Node base URL, overriding the configuration.
    #[arg(long, global = true)]
    node: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show an account's balance and history.
    Balance {
        #[arg(short, long)]
        account: String,

        /// Print the account view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Submit a transfer to the node.
    Send {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Amount in base units; defaults to the configured amount.
        #[arg(long)]
        amount: Option<Amount>,
    },

    /// Re-fetch and redraw an account until interrupted.
    Watch {
        #[arg(short, long)]
        account: String,

        /// Poll interval in seconds; defaults to the configured interval.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Interactive session: switch accounts, send, refresh.
    Shell {
        #[arg(short, long, default_value = "")]
        account: String,
    },

    /// Show the node's chain tip.
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_base_url(cli.node),
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    tracing::debug!(node = %config.node.base_url, "chain-wallet starting");

    let result = match cli.command {
        Commands::Balance { account, json } => run_balance(&config, AccountId::from(account), json).await,
        Commands::Send { from, to, amount } => {
            let amount = amount.unwrap_or_else(|| config.wallet.default_amount());
            run_send(&config, AccountId::from(from), AccountId::from(to), amount).await
        }
        Commands::Watch { account, interval } => {
            let interval = interval
                .map(|secs| std::time::Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.wallet.poll_interval());
            run_watch(&config, AccountId::from(account), interval).await
        }
        Commands::Shell { account } => run_shell(&config, AccountId::from(account)).await,
        Commands::Status => run_status(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}
