//! Per-symbol balance grouped by chain

use serde::{Deserialize, Serialize};

use super::normalizer::parse_decimal;
use super::types::UnifiedBalanceResult;

/// One chain's share of a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSubtotal {
    pub chain_label: String,
    pub chain_id: Option<u64>,
    pub total_balance: f64,
    pub total_fiat: f64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSummary {
    pub symbol: String,
    pub per_chain: Vec<ChainSubtotal>,
    pub total_balance: f64,
    pub total_fiat: f64,
}

/// Group the positive entries of `symbol` by chain label, first-seen order
pub fn summarize_symbol(result: &UnifiedBalanceResult, symbol: &str) -> SymbolSummary {
    let mut per_chain: Vec<ChainSubtotal> = Vec::new();

    for entry in result.entries.iter().filter(|e| e.token_symbol == symbol) {
        let amount = parse_decimal(&entry.balance_decimal);
        if amount <= 0.0 {
            continue;
        }

        match per_chain.iter_mut().find(|c| c.chain_label == entry.chain_label) {
            Some(subtotal) => {
                subtotal.total_balance += amount;
                subtotal.total_fiat += entry.fiat_value;
                subtotal.entry_count += 1;
                if subtotal.chain_id.is_none() {
                    subtotal.chain_id = entry.chain_id;
                }
            }
            None => per_chain.push(ChainSubtotal {
                chain_label: entry.chain_label.clone(),
                chain_id: entry.chain_id,
                total_balance: amount,
                total_fiat: entry.fiat_value,
                entry_count: 1,
            }),
        }
    }

    SymbolSummary {
        symbol: symbol.to_string(),
        total_balance: per_chain.iter().map(|c| c.total_balance).sum(),
        total_fiat: per_chain.iter().map(|c| c.total_fiat).sum(),
        per_chain,
    }
}
