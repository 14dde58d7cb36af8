// Common library for the CrossDonate balance workspace
//
// This crate provides the pieces shared by every balance consumer: the chain
// table, raw Nexus SDK records, SDK ports, retry helpers and the error taxonomy.

pub mod error;
pub mod format;

// Bridge types for cross-chain balance reads
pub mod bridge_types;

// Re-export bridge_types for convenience
pub use bridge_types::{
    Chain, ChainIdRef, ChainRef, RawAssetRecord, BreakdownItem, RefreshPhase, RetryConfig,
    PollConfig, NexusConnector, NexusSession, ProviderSource, WalletProvider, ProviderKind,
};
pub use error::BalanceError;
