//! Demo balances shown while the Nexus SDK is unreachable

use super::types::{NormalizedEntry, UnifiedBalanceResult};

/// Static fallback view; the total is derived from the entries
pub fn fallback_result() -> UnifiedBalanceResult {
    UnifiedBalanceResult::from_entries(vec![
        NormalizedEntry::new("Ethereum", "ETH", "0.5", 1000.0),
        NormalizedEntry::new("Ethereum", "USDC", "1000", 1000.0).with_decimals(6),
        NormalizedEntry::new("Base", "ETH", "0.1", 200.0),
        NormalizedEntry::new("Arbitrum", "USDT", "500", 500.0).with_decimals(6),
        NormalizedEntry::new("Polygon", "MATIC", "100", 50.75),
    ])
}
