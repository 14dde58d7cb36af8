//! Unified balance view
//!
//! Normalization of raw Nexus records, fiat aggregation, per-symbol summaries
//! and the static fallback shown when fetching fails.

pub mod aggregate;
pub mod fallback;
pub mod normalizer;
pub mod summary;
pub mod types;

pub use aggregate::total_fiat;
pub use fallback::fallback_result;
pub use normalizer::{normalize_balances, parse_decimal};
pub use summary::{summarize_symbol, ChainSubtotal, SymbolSummary};
pub use types::{CurrentChainBalance, NormalizedEntry, UnifiedBalanceResult, DEFAULT_DECIMALS};
