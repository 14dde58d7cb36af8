//! CrossDonate wallet balance CLI
//!
//! Normalizes Nexus unified balance dumps and runs the refresh cycle
//! against a file-backed session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use common::bridge_types::Chain;
use common::format::{short_address, short_chain_name};
use wallet::{
    init_logging,
    nexus::read_records,
    normalize_balances, summarize_symbol, BalanceOrchestrator, CurrentChainBalance,
    FixedProviderSource, JsonFileConnector, UnifiedBalanceResult, WalletConfig,
};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a unified balance dump
    Normalize {
        /// JSON array of raw balance records
        input: PathBuf,

        #[command(flatten)]
        current: CurrentChainArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also summarize one token across chains
        #[arg(long)]
        symbol: Option<String>,
    },

    /// Run one orchestrated refresh against a balance dump
    Refresh {
        /// JSON array of raw balance records
        input: PathBuf,

        /// Connected wallet account
        #[arg(short, long)]
        account: String,

        /// Chain the wallet is connected to
        #[arg(long)]
        chain_id: Option<u64>,

        #[command(flatten)]
        current: CurrentChainArgs,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known chains, or look one up by name or id
    Chains {
        query: Option<String>,
    },
}

/// Native balance on the connected chain
#[derive(Args)]
struct CurrentChainArgs {
    #[arg(long)]
    current_chain_id: Option<u64>,

    #[arg(long)]
    current_symbol: Option<String>,

    #[arg(long)]
    current_balance: Option<String>,

    #[arg(long, default_value_t = 18)]
    current_decimals: u32,

    /// Balance in minor units
    #[arg(long)]
    current_raw: Option<String>,
}

impl CurrentChainArgs {
    fn balance(&self) -> Result<Option<CurrentChainBalance>> {
        match (&self.current_symbol, &self.current_balance) {
            (Some(symbol), Some(balance)) => {
                let mut current =
                    CurrentChainBalance::new(symbol, balance, self.current_decimals, self.current_chain_id);
                if let Some(raw) = &self.current_raw {
                    current = current.with_raw_balance(raw);
                }
                Ok(Some(current))
            }
            (None, None) => Ok(None),
            _ => bail!("--current-symbol and --current-balance must be given together"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = WalletConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    match cli.command {
        Commands::Normalize { input, current, json, symbol } => {
            normalize(&input, current.balance()?, json, symbol.as_deref()).await?;
        }
        Commands::Refresh { input, account, chain_id, current, json } => {
            refresh(config, input, &account, chain_id, current.balance()?, json).await?;
        }
        Commands::Chains { query } => list_chains(query.as_deref())?,
    }

    Ok(())
}

async fn normalize(
    input: &Path,
    current: Option<CurrentChainBalance>,
    json: bool,
    symbol: Option<&str>,
) -> Result<()> {
    let records = read_records(input)
        .await
        .with_context(|| format!("Failed to read balance dump {}", input.display()))?;
    info!("Normalizing {} record(s) from {}", records.len(), input.display());

    let result = normalize_balances(&records, current.as_ref());
    let summary = symbol.map(|symbol| summarize_symbol(&result, symbol));

    if json {
        let output = serde_json::json!({ "balances": result, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_table(&result);
    if let Some(summary) = summary {
        println!();
        println!("{}: {} (${:.2})", summary.symbol, summary.total_balance, summary.total_fiat);
        for chain in &summary.per_chain {
            println!(
                "  {:<12} {:>20} ${:>12.2}",
                short_chain_name(Some(&chain.chain_label)),
                chain.total_balance,
                chain.total_fiat
            );
        }
    }
    Ok(())
}

async fn refresh(
    config: WalletConfig,
    input: PathBuf,
    account: &str,
    chain_id: Option<u64>,
    current: Option<CurrentChainBalance>,
    json: bool,
) -> Result<()> {
    let orchestrator = BalanceOrchestrator::new(
        Arc::new(JsonFileConnector::new(input)),
        Arc::new(FixedProviderSource::new(chain_id)),
        config,
    );

    orchestrator.connect(account, chain_id).await;
    orchestrator.set_current_chain_balance(current).await;
    orchestrator.refresh().await;

    let state = orchestrator.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("Account: {}", short_address(account));
    println!("Status:  {}", state.phase);
    if let Some(error) = &state.error {
        println!("Warning: {}", error);
    }
    if let Some(result) = &state.result {
        print_table(result);
    }

    if !state.phase.is_terminal() {
        bail!("Refresh did not complete: {}", state.phase);
    }
    if let Some(reason) = state.phase.failure_reason() {
        if state.result.is_none() {
            bail!("Refresh failed: {}", reason);
        }
    }
    Ok(())
}

fn print_table(result: &UnifiedBalanceResult) {
    println!("{:<20} {:<8} {:>24} {:>14}", "CHAIN", "TOKEN", "BALANCE", "FIAT");
    for entry in &result.entries {
        println!(
            "{:<20} {:<8} {:>24} {:>14.2}",
            entry.chain_label, entry.token_symbol, entry.balance_decimal, entry.fiat_value
        );
    }
    println!("Total: ${:.2}", result.total_fiat_value);
}

fn list_chains(query: Option<&str>) -> Result<()> {
    let chains = match query {
        Some(query) => vec![query.parse::<Chain>().map_err(anyhow::Error::msg)?],
        None => Chain::supported_chains(),
    };

    for chain in chains {
        println!(
            "{:>10}  {:<20} {}",
            chain.chain_id(),
            chain.display_name(),
            if chain.is_testnet() { "testnet" } else { "mainnet" }
        );
    }
    Ok(())
}
