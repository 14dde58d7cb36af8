// wallet/src/lib.rs

//! Unified cross-chain balance view for CrossDonate wallets
//!
//! Normalizes Nexus SDK balance responses into a flat per-chain list and
//! drives the fetch cycle behind the balance view.

pub use crate::balance::{
    fallback_result, normalize_balances, summarize_symbol, CurrentChainBalance, NormalizedEntry,
    SymbolSummary, UnifiedBalanceResult,
};
pub use crate::config::WalletConfig;
pub use crate::error::{BalanceError, ConfigError, Result};
pub use crate::nexus::{BalanceOrchestrator, BalanceState, FixedProviderSource, JsonFileConnector};

pub mod balance;
pub mod config;
pub mod error;
pub mod nexus;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
