//! # Bridge Types Module
//!
//! Data types, traits and helpers shared by everything that reads balances
//! through the Nexus bridge SDK.

pub mod balance;
pub mod chain;
pub mod monitoring;
pub mod providers;
pub mod status;
pub mod types;

pub use balance::{BreakdownItem, ChainInfo, ChainRef, RawAssetRecord};
pub use chain::{chain_label, resolve_chain_name, Chain, ChainIdRef, UNKNOWN_CHAIN};
pub use monitoring::{poll_for, retry_with_backoff};
pub use providers::{NexusConnector, NexusSession, ProviderKind, ProviderSource, WalletProvider};
pub use status::RefreshPhase;
pub use types::{PollConfig, RetryConfig};
