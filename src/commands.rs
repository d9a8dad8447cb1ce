//! Command handlers behind the CLI. Each one owns the fetch/reconcile/render
//! loop for its mode; nothing recomputes implicitly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::ledger::block::LedgerSnapshot;
use crate::node::{NodeClient, RetryPolicy};
use crate::types::amount::Amount;
use crate::types::ids::AccountId;
use crate::view::controller::{FetchTicket, RefreshOutcome, ViewController};
use crate::view::render::render_screen;

pub fn build_controller(config: &AppConfig, account: AccountId) -> Result<ViewController> {
    let client = Arc::new(NodeClient::new(&config.node, RetryPolicy::from(&config.retry))?);
    Ok(ViewController::new(client.clone(), client, account))
}

pub async fn run_balance(config: &AppConfig, account: AccountId, json: bool) -> anyhow::Result<()> {
    let mut vc = build_controller(config, account)?;

    match vc.refresh().await {
        RefreshOutcome::Applied => {}
        RefreshOutcome::Unavailable(e) => {
            println!("{}", render_screen(&vc.screen()));
            return Err(e).context("could not load ledger");
        }
        RefreshOutcome::Superseded => return Err(anyhow!("refresh superseded")),
    }

    if json {
        let view = vc.view().ok_or_else(|| anyhow!("no account view"))?;
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_screen(&vc.screen()));
    }
    Ok(())
}

pub async fn run_send(
    config: &AppConfig,
    from: AccountId,
    to: AccountId,
    amount: Amount,
) -> anyhow::Result<()> {
    let mut vc = build_controller(config, from)?;
    let pending = vc.submit_payment(to, amount).await?;

    println!("Transfer accepted (unconfirmed): {}", pending.receipt.message);
    if let Some(block) = pending.receipt.expected_block {
        println!("Expected in block {}", block);
    }
    Ok(())
}

pub async fn run_watch(config: &AppConfig, account: AccountId, interval: Duration) -> anyhow::Result<()> {
    let vc = build_controller(config, account)?;
    watch_until(vc, interval, tokio::signal::ctrl_c()).await;
    Ok(())
}

/// Poll and redraw until `shutdown` resolves, including while a fetch is in flight.
async fn watch_until<S: Future>(mut vc: ViewController, interval: Duration, shutdown: S) {
    let mut ticker = tokio::time::interval(interval);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        let outcome = tokio::select! {
            outcome = vc.refresh() => outcome,
            _ = &mut shutdown => break,
        };
        if let RefreshOutcome::Unavailable(e) = outcome {
            eprintln!("{}", e);
        }
        print!("{}", render_screen(&vc.screen()));
        println!();
    }

    tracing::info!("Interrupted, stopping watch");
}

pub async fn run_status(config: &AppConfig) -> anyhow::Result<()> {
    let vc = build_controller(config, AccountId::default())?;
    let tip = vc.chain_tip().await.context("could not load chain tip")?;

    let index = tip.index.map(|i| i.to_string()).unwrap_or_else(|| "?".to_string());
    println!("Chain tip: block {}", index);
    println!("Transactions in tip: {}", tip.transactions.len());
    if let Some(hash) = &tip.previous_hash {
        println!("Previous hash: {}", hash);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Account(AccountId),
    Send { to: AccountId, amount: Option<Amount> },
    Refresh,
    Show,
    Help,
    Quit,
}

pub fn parse_shell_command(line: &str) -> Result<ShellCommand> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Show);
    };

    let command = match verb {
        "account" | "a" => {
            // A bare `account` selects the empty identifier.
            ShellCommand::Account(AccountId::from(words.next().unwrap_or("")))
        }
        "send" | "s" => {
            let to = words
                .next()
                .ok_or_else(|| Error::InvalidInput("usage: send <recipient> [amount]".to_string()))?;
            let amount = words
                .next()
                .map(|a| a.parse::<Amount>())
                .transpose()
                .map_err(|e| Error::InvalidInput(format!("invalid amount: {}", e)))?;
            ShellCommand::Send { to: AccountId::from(to), amount }
        }
        "refresh" | "r" => ShellCommand::Refresh,
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(Error::InvalidInput(format!("unknown command: {}", other))),
    };

    if words.next().is_some() {
        return Err(Error::InvalidInput(format!("too many arguments for `{}`", verb)));
    }
    Ok(command)
}

const SHELL_HELP: &str = "commands: account <id> | send <to> [amount] | refresh | show | quit";

type FetchResult = (FetchTicket, Result<LedgerSnapshot>);

fn spawn_fetch(vc: &ViewController, ticket: FetchTicket, results: &mpsc::Sender<FetchResult>) {
    let fetch = vc.fetch_for(ticket);
    let results = results.clone();
    tokio::spawn(async move {
        let _ = results.send(fetch.await).await;
    });
}

pub async fn run_shell(config: &AppConfig, account: AccountId) -> anyhow::Result<()> {
    let mut vc = build_controller(config, account)?;
    let default_amount = config.wallet.default_amount();
    let (results_tx, mut results_rx) = mpsc::channel::<FetchResult>(16);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", SHELL_HELP);
    let ticket = vc.begin_refresh();
    spawn_fetch(&vc, ticket, &results_tx);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                let command = match parse_shell_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match command {
                    ShellCommand::Account(id) => {
                        let ticket = vc.set_account(id);
                        if vc.view().is_some() {
                            print!("{}", render_screen(&vc.screen()));
                        }
                        spawn_fetch(&vc, ticket, &results_tx);
                    }
                    ShellCommand::Send { to, amount } => {
                        match vc.submit_payment(to, amount.unwrap_or(default_amount)).await {
                            Ok(pending) => println!("Transfer accepted (unconfirmed): {}", pending.receipt.message),
                            Err(e) => println!("Transfer failed: {}", e),
                        }
                        print!("{}", render_screen(&vc.screen()));
                    }
                    ShellCommand::Refresh => {
                        let ticket = vc.begin_refresh();
                        spawn_fetch(&vc, ticket, &results_tx);
                    }
                    ShellCommand::Show => print!("{}", render_screen(&vc.screen())),
                    ShellCommand::Help => println!("{}", SHELL_HELP),
                    ShellCommand::Quit => return Ok(()),
                }
            }
            Some((ticket, result)) = results_rx.recv() => {
                match vc.complete_refresh(ticket, result) {
                    RefreshOutcome::Applied => print!("{}", render_screen(&vc.screen())),
                    RefreshOutcome::Unavailable(e) => {
                        println!("{}", e);
                        print!("{}", render_screen(&vc.screen()));
                    }
                    RefreshOutcome::Superseded => {}
                }
            }
        }
    }
}
