//! Normalized balance types

use serde::{Deserialize, Serialize};

use super::aggregate::total_fiat;

/// Token decimals assumed when the SDK does not report them
pub const DEFAULT_DECIMALS: u32 = 18;

/// One (chain, token) balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    /// Never empty
    pub chain_label: String,
    pub token_symbol: String,
    /// Chain-specific decimal string
    pub balance_decimal: String,
    pub decimals: u32,
    pub fiat_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_balance_minor_units: Option<String>,
}

impl NormalizedEntry {
    pub fn new(chain_label: &str, token_symbol: &str, balance_decimal: &str, fiat_value: f64) -> Self {
        Self {
            chain_label: chain_label.to_string(),
            token_symbol: token_symbol.to_string(),
            balance_decimal: balance_decimal.to_string(),
            decimals: DEFAULT_DECIMALS,
            fiat_value,
            chain_id: None,
            contract_address: None,
            raw_balance_minor_units: None,
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Whether this entry is for the given (chain id, symbol) pair
    pub fn matches(&self, chain_id: u64, symbol: &str) -> bool {
        self.chain_id == Some(chain_id) && self.token_symbol == symbol
    }
}

/// Flat balance view plus its fiat total
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedBalanceResult {
    pub total_fiat_value: f64,
    pub entries: Vec<NormalizedEntry>,
}

impl UnifiedBalanceResult {
    /// Build a result whose total is derived from the entries
    pub fn from_entries(entries: Vec<NormalizedEntry>) -> Self {
        Self {
            total_fiat_value: total_fiat(&entries),
            entries,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Native balance on the network the wallet is connected to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentChainBalance {
    pub symbol: String,
    pub formatted_balance: String,
    pub decimals: u32,
    pub chain_id: Option<u64>,
    pub raw_balance_minor_units: Option<String>,
}

impl CurrentChainBalance {
    pub fn new(symbol: &str, formatted_balance: &str, decimals: u32, chain_id: Option<u64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            formatted_balance: formatted_balance.to_string(),
            decimals,
            chain_id,
            raw_balance_minor_units: None,
        }
    }

    pub fn with_raw_balance(mut self, raw: &str) -> Self {
        self.raw_balance_minor_units = Some(raw.to_string());
        self
    }
}
