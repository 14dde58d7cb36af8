//! Chain enum and chain label resolution
//!
//! This module defines the `Chain` enum for the networks the Nexus bridge
//! reports balances on, the loosely typed `ChainIdRef` found in SDK responses,
//! and `resolve_chain_name`, which turns any chain id into a display label.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// Label used when no chain information is available at all
pub const UNKNOWN_CHAIN: &str = "Unknown";

/// Networks with a known display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// Ethereum mainnet
    Ethereum,
    /// Ethereum Sepolia testnet
    Sepolia,
    /// Base mainnet
    Base,
    /// Base Sepolia testnet
    BaseSepolia,
    /// Arbitrum One
    ArbitrumOne,
    /// Arbitrum Sepolia testnet
    ArbitrumSepolia,
    /// OP mainnet
    Optimism,
    /// OP Sepolia testnet
    OptimismSepolia,
    /// Polygon PoS
    Polygon,
    /// Polygon Amoy testnet
    PolygonAmoy,
}

impl Chain {
    /// EVM chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Sepolia => 11155111,
            Chain::Base => 8453,
            Chain::BaseSepolia => 84532,
            Chain::ArbitrumOne => 42161,
            Chain::ArbitrumSepolia => 421614,
            Chain::Optimism => 10,
            Chain::OptimismSepolia => 11155420,
            Chain::Polygon => 137,
            Chain::PolygonAmoy => 80002,
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Sepolia => "Sepolia",
            Chain::Base => "Base",
            Chain::BaseSepolia => "Base Sepolia",
            Chain::ArbitrumOne => "Arbitrum One",
            Chain::ArbitrumSepolia => "Arbitrum Sepolia",
            Chain::Optimism => "Optimism",
            Chain::OptimismSepolia => "Optimism Sepolia",
            Chain::Polygon => "Polygon",
            Chain::PolygonAmoy => "Polygon Amoy",
        }
    }

    /// Look up a chain by its EVM chain id
    pub fn from_chain_id(id: u64) -> Option<Self> {
        Self::supported_chains().into_iter().find(|chain| chain.chain_id() == id)
    }

    /// Check if chain is a test network
    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            Chain::Sepolia
                | Chain::BaseSepolia
                | Chain::ArbitrumSepolia
                | Chain::OptimismSepolia
                | Chain::PolygonAmoy
        )
    }

    /// Get a list of all known chains
    pub fn supported_chains() -> Vec<Self> {
        vec![
            Self::Ethereum,
            Self::Sepolia,
            Self::Base,
            Self::BaseSepolia,
            Self::ArbitrumOne,
            Self::ArbitrumSepolia,
            Self::Optimism,
            Self::OptimismSepolia,
            Self::Polygon,
            Self::PolygonAmoy,
        ]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Chain {
    type Err = String;

    /// Accepts a display name (case-insensitive) or a numeric chain id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u64>() {
            return Self::from_chain_id(id).ok_or_else(|| format!("Unknown chain id: {}", id));
        }
        Self::supported_chains()
            .into_iter()
            .find(|chain| chain.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown chain: {}", s))
    }
}

/// Chain id as reported by the SDK: sometimes a number, sometimes a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainIdRef {
    Numeric(u64),
    Text(String),
}

impl ChainIdRef {
    /// Numeric value, if the reference holds or spells a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ChainIdRef::Numeric(id) => Some(*id),
            ChainIdRef::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Zero and empty ids carry no information
    pub fn is_empty(&self) -> bool {
        match self {
            ChainIdRef::Numeric(id) => *id == 0,
            ChainIdRef::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<u64> for ChainIdRef {
    fn from(id: u64) -> Self {
        ChainIdRef::Numeric(id)
    }
}

impl fmt::Display for ChainIdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainIdRef::Numeric(id) => write!(f, "{}", id),
            ChainIdRef::Text(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// Resolve a display label for a chain id.
///
/// Never fails: missing ids give `"Unknown"`, ids outside the known table give
/// `"Chain <id>"`.
pub fn resolve_chain_name(chain_id: Option<&ChainIdRef>) -> String {
    match chain_id {
        None => UNKNOWN_CHAIN.to_string(),
        Some(id) if id.is_empty() => UNKNOWN_CHAIN.to_string(),
        Some(id) => match id.as_u64().and_then(Chain::from_chain_id) {
            Some(chain) => chain.display_name().to_string(),
            None => format!("Chain {}", id),
        },
    }
}

/// Shorthand for resolving a numeric id
pub fn chain_label(chain_id: u64) -> String {
    resolve_chain_name(Some(&ChainIdRef::Numeric(chain_id)))
}
