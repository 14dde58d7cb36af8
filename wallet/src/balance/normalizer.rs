//! Flattens raw Nexus asset records into per-chain balance entries
//!
//! Every alias the SDK may use is resolved here through explicit fallback
//! chains; nothing downstream looks at `RawAssetRecord` fields.

use common::bridge_types::{
    chain_label, resolve_chain_name, BreakdownItem, ChainIdRef, ChainRef, RawAssetRecord,
};
use tracing::debug;

use super::types::{CurrentChainBalance, NormalizedEntry, UnifiedBalanceResult, DEFAULT_DECIMALS};

const UNKNOWN_SYMBOL: &str = "Unknown";

/// Parse a decimal string; anything malformed or non-finite is 0
pub fn parse_decimal(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn record_symbol(record: &RawAssetRecord) -> &str {
    non_empty(record.symbol.as_deref())
        .or_else(|| non_empty(record.token.as_deref()))
        .unwrap_or(UNKNOWN_SYMBOL)
}

fn record_decimals(record: &RawAssetRecord) -> u32 {
    record.decimals.filter(|d| *d > 0).unwrap_or(DEFAULT_DECIMALS)
}

/// Id used for label lookup: the descriptor's id wins over the loose field
fn effective_chain_id(chain: Option<&ChainRef>, loose: Option<&ChainIdRef>) -> Option<ChainIdRef> {
    chain
        .and_then(ChainRef::id)
        .or_else(|| loose.cloned())
        .filter(|id| !id.is_empty())
}

fn breakdown_entry(
    record: &RawAssetRecord,
    item: &BreakdownItem,
    record_total: f64,
) -> Option<NormalizedEntry> {
    let balance = item.balance.as_deref().unwrap_or("0");
    let amount = parse_decimal(balance);
    if amount <= 0.0 {
        return None;
    }

    let chain_id = effective_chain_id(item.chain.as_ref(), item.chain_id.as_ref());
    let chain_label = non_empty(item.chain.as_ref().and_then(ChainRef::name))
        .or_else(|| non_empty(item.chain_name.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| resolve_chain_name(chain_id.as_ref()));

    let fiat_value = match record.reported_fiat() {
        Some(record_fiat) if record_total > 0.0 => {
            finite_or_zero(amount / record_total * record_fiat)
        }
        _ => 0.0,
    };

    Some(NormalizedEntry {
        chain_label,
        token_symbol: record_symbol(record).to_string(),
        balance_decimal: balance.to_string(),
        decimals: record_decimals(record),
        fiat_value,
        chain_id: chain_id.as_ref().and_then(ChainIdRef::as_u64),
        contract_address: item.contract_address.clone(),
        raw_balance_minor_units: item.raw_balance.clone(),
    })
}

fn flat_entry(record: &RawAssetRecord) -> Option<NormalizedEntry> {
    let balance = non_empty(record.balance.as_deref())
        .or_else(|| non_empty(record.amount.as_deref()))
        .or_else(|| non_empty(record.formatted_balance.as_deref()))
        .unwrap_or("0");
    if parse_decimal(balance) <= 0.0 {
        return None;
    }

    let chain_id = effective_chain_id(record.chain.as_ref(), record.chain_id.as_ref());
    let chain_label = non_empty(record.chain.as_ref().and_then(ChainRef::name))
        .or_else(|| non_empty(record.chain_name.as_deref()))
        .or_else(|| non_empty(record.network.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| resolve_chain_name(chain_id.as_ref()));

    // first reported value wins, even when it is zero
    let fiat_value = [
        record.balance_in_fiat,
        record.fiat_value,
        record.usd_value,
        record.value,
        record.price_usd,
    ]
    .into_iter()
    .flatten()
    .next()
    .map(finite_or_zero)
    .unwrap_or(0.0);

    Some(NormalizedEntry {
        chain_label,
        token_symbol: record_symbol(record).to_string(),
        balance_decimal: balance.to_string(),
        decimals: record_decimals(record),
        fiat_value,
        chain_id: chain_id.as_ref().and_then(ChainIdRef::as_u64),
        contract_address: record.contract_address.clone(),
        raw_balance_minor_units: record.raw_balance.clone(),
    })
}

fn merge_current_chain(entries: &mut Vec<NormalizedEntry>, current: &CurrentChainBalance) {
    let Some(chain_id) = current.chain_id.filter(|id| *id != 0) else {
        debug!("Current chain balance has no chain id, skipping merge");
        return;
    };

    if entries.iter().any(|entry| entry.matches(chain_id, &current.symbol)) {
        debug!("{} on chain {} already reported by Nexus", current.symbol, chain_id);
        return;
    }

    if parse_decimal(&current.formatted_balance) <= 0.0 {
        return;
    }

    entries.push(NormalizedEntry {
        chain_label: chain_label(chain_id),
        token_symbol: current.symbol.clone(),
        balance_decimal: current.formatted_balance.clone(),
        decimals: current.decimals,
        fiat_value: 0.0,
        chain_id: Some(chain_id),
        contract_address: None,
        raw_balance_minor_units: current.raw_balance_minor_units.clone(),
    });
}

/// Normalize a unified balance response.
///
/// Entries come out in processing order: per record, per breakdown item,
/// then the current-chain balance if Nexus did not already report it.
/// Non-positive balances are dropped. Never panics on malformed input.
pub fn normalize_balances(
    records: &[RawAssetRecord],
    current_chain: Option<&CurrentChainBalance>,
) -> UnifiedBalanceResult {
    let mut entries = Vec::new();

    for record in records {
        match record.breakdown_items() {
            Some(items) => {
                let record_total = parse_decimal(record.balance.as_deref().unwrap_or("0"));
                entries.extend(
                    items
                        .iter()
                        .filter_map(|item| breakdown_entry(record, item, record_total)),
                );
            }
            None => entries.extend(flat_entry(record)),
        }
    }

    if let Some(current) = current_chain {
        merge_current_chain(&mut entries, current);
    }

    debug!("Normalized {} record(s) into {} entries", records.len(), entries.len());
    UnifiedBalanceResult::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::aggregate::total_fiat;
    use common::bridge_types::ChainInfo;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 1.25 "), 1.25);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
        assert_eq!(parse_decimal("inf"), 0.0);
        assert_eq!(parse_decimal("-3"), -3.0);
    }

    #[test]
    fn test_single_chain_breakdown() {
        let records = vec![RawAssetRecord::new("ETH", "0.5")
            .with_fiat_value(1000.0)
            .with_breakdown(vec![BreakdownItem::new(ChainRef::info(1, "Ethereum"), "0.5")])];

        let result = normalize_balances(&records, None);

        assert_eq!(result.entries.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.chain_label, "Ethereum");
        assert_eq!(entry.token_symbol, "ETH");
        assert_eq!(entry.balance_decimal, "0.5");
        assert_eq!(entry.chain_id, Some(1));
        assert_eq!(entry.decimals, 18);
        assert_close(entry.fiat_value, 1000.0);
        assert_close(result.total_fiat_value, 1000.0);
    }

    #[test]
    fn test_zero_balance_with_empty_breakdown() {
        let records = vec![RawAssetRecord::new("USDT", "0").with_breakdown(vec![])];
        let result = normalize_balances(&records, None);
        assert!(result.entries.is_empty());
        assert_eq!(result.total_fiat_value, 0.0);
    }

    #[test]
    fn test_proportional_attribution() {
        let records = vec![RawAssetRecord::new("USDC", "100")
            .with_fiat_value(100.0)
            .with_decimals(6)
            .with_breakdown(vec![
                BreakdownItem::new(ChainRef::named("Ethereum"), "60"),
                BreakdownItem::new(ChainRef::named("Polygon"), "40"),
            ])];

        let result = normalize_balances(&records, None);

        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].chain_label, "Ethereum");
        assert_close(result.entries[0].fiat_value, 60.0);
        assert_eq!(result.entries[1].chain_label, "Polygon");
        assert_close(result.entries[1].fiat_value, 40.0);
        assert_eq!(result.entries[1].decimals, 6);
    }

    #[test]
    fn test_unknown_chain_id_label() {
        let item = BreakdownItem { balance: Some("1".into()), ..BreakdownItem::default() }
            .with_chain_id(99999u64);
        let records = vec![RawAssetRecord::new("ETH", "1").with_breakdown(vec![item])];

        let result = normalize_balances(&records, None);
        assert_eq!(result.entries[0].chain_label, "Chain 99999");
        assert_eq!(result.entries[0].chain_id, Some(99999));

        let flat = vec![RawAssetRecord::new("ETH", "1").with_chain_id(99999u64)];
        assert_eq!(normalize_balances(&flat, None).entries[0].chain_label, "Chain 99999");
    }

    #[test]
    fn test_breakdown_label_priority() {
        let described = BreakdownItem {
            chain: Some(ChainRef::info(8453, "Base Mainnet")),
            chain_name: Some("ignored".into()),
            balance: Some("1".into()),
            ..BreakdownItem::default()
        };
        let unnamed_descriptor = BreakdownItem {
            chain: Some(ChainRef::Info(ChainInfo { id: Some(ChainIdRef::Numeric(42161)), ..ChainInfo::default() })),
            balance: Some("1".into()),
            ..BreakdownItem::default()
        };
        let loose_name = BreakdownItem {
            chain_name: Some("Custom L2".into()),
            chain_id: Some(ChainIdRef::Text("777".into())),
            balance: Some("1".into()),
            ..BreakdownItem::default()
        };
        let nothing = BreakdownItem { balance: Some("1".into()), ..BreakdownItem::default() };

        let records = vec![RawAssetRecord::new("ETH", "4")
            .with_breakdown(vec![described, unnamed_descriptor, loose_name, nothing])];
        let labels: Vec<_> = normalize_balances(&records, None)
            .entries
            .into_iter()
            .map(|e| (e.chain_label, e.chain_id))
            .collect();

        assert_eq!(
            labels,
            vec![
                ("Base Mainnet".to_string(), Some(8453)),
                ("Arbitrum One".to_string(), Some(42161)),
                ("Custom L2".to_string(), Some(777)),
                ("Unknown".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_flat_record_fallbacks() {
        let record = RawAssetRecord {
            token: Some("DAI".into()),
            amount: Some("12".into()),
            chain_name: Some("Optimism".into()),
            network: Some("op-mainnet".into()),
            usd_value: Some(12.0),
            price_usd: Some(1.0),
            ..RawAssetRecord::default()
        };
        let result = normalize_balances(&[record], None);

        let entry = &result.entries[0];
        assert_eq!(entry.token_symbol, "DAI");
        assert_eq!(entry.balance_decimal, "12");
        assert_eq!(entry.chain_label, "Optimism");
        assert_eq!(entry.fiat_value, 12.0);
        assert_eq!(entry.decimals, 18);

        let networked = RawAssetRecord {
            symbol: Some("ETH".into()),
            formatted_balance: Some("0.2".into()),
            network: Some("zora".into()),
            fiat_value: Some(0.0),
            usd_value: Some(400.0),
            ..RawAssetRecord::default()
        };
        let entry = &normalize_balances(&[networked], None).entries[0];
        assert_eq!(entry.chain_label, "zora");
        assert_eq!(entry.fiat_value, 0.0);
    }

    #[test]
    fn test_record_fiat_unknown_or_total_zero() {
        let no_fiat = RawAssetRecord::new("ETH", "1")
            .with_breakdown(vec![BreakdownItem::new(ChainRef::named("Base"), "1")]);
        let zero_total = RawAssetRecord::new("ETH", "0")
            .with_fiat_value(50.0)
            .with_breakdown(vec![BreakdownItem::new(ChainRef::named("Base"), "1")]);
        let garbage_total = RawAssetRecord::new("ETH", "lots")
            .with_fiat_value(50.0)
            .with_breakdown(vec![BreakdownItem::new(ChainRef::named("Base"), "1")]);

        let result = normalize_balances(&[no_fiat, zero_total, garbage_total], None);
        assert_eq!(result.entries.len(), 3);
        assert!(result.entries.iter().all(|e| e.fiat_value == 0.0));
    }

    #[test]
    fn test_non_positive_balances_dropped() {
        let records = vec![
            RawAssetRecord::new("ETH", "1").with_breakdown(vec![
                BreakdownItem::new(ChainRef::named("Base"), "0"),
                BreakdownItem::new(ChainRef::named("Optimism"), "-1"),
                BreakdownItem::new(ChainRef::named("Polygon"), "not-a-number"),
                BreakdownItem::new(ChainRef::named("Ethereum"), "1"),
            ]),
            RawAssetRecord::new("USDC", "0.000"),
            RawAssetRecord::new("DAI", "-5"),
            RawAssetRecord::default(),
        ];

        let result = normalize_balances(&records, None);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].chain_label, "Ethereum");
    }

    #[test]
    fn test_current_chain_not_duplicated() {
        let records = vec![RawAssetRecord::new("ETH", "1")
            .with_breakdown(vec![BreakdownItem::new(ChainRef::info(1, "Ethereum"), "1")])];
        let current = CurrentChainBalance::new("ETH", "1", 18, Some(1));

        let result = normalize_balances(&records, Some(&current));
        assert_eq!(result.entries.len(), 1);
    }

    #[test]
    fn test_current_chain_appended() {
        let records = vec![RawAssetRecord::new("ETH", "1")
            .with_breakdown(vec![BreakdownItem::new(ChainRef::info(1, "Ethereum"), "1")])];
        let current = CurrentChainBalance::new("ETH", "0.25", 18, Some(11155111))
            .with_raw_balance("250000000000000000");

        let result = normalize_balances(&records, Some(&current));

        assert_eq!(result.entries.len(), 2);
        let appended = &result.entries[1];
        assert_eq!(appended.chain_label, "Sepolia");
        assert_eq!(appended.fiat_value, 0.0);
        assert_eq!(appended.raw_balance_minor_units.as_deref(), Some("250000000000000000"));
    }

    #[test]
    fn test_current_chain_skipped_without_id_or_balance() {
        let no_id = CurrentChainBalance::new("ETH", "1", 18, None);
        assert!(normalize_balances(&[], Some(&no_id)).entries.is_empty());

        let empty = CurrentChainBalance::new("ETH", "0", 18, Some(10));
        assert!(normalize_balances(&[], Some(&empty)).entries.is_empty());
    }

    #[test]
    fn test_total_matches_entries() {
        let records = vec![
            RawAssetRecord::new("USDC", "3")
                .with_fiat_value(3.0)
                .with_breakdown(vec![
                    BreakdownItem::new(ChainRef::named("Base"), "1"),
                    BreakdownItem::new(ChainRef::named("Optimism"), "1"),
                    BreakdownItem::new(ChainRef::named("Polygon"), "1"),
                ]),
            RawAssetRecord { usd_value: Some(f64::NAN), ..RawAssetRecord::new("ETH", "1") },
            RawAssetRecord { value: Some(0.1), ..RawAssetRecord::new("ARB", "1") },
        ];

        let result = normalize_balances(&records, None);
        assert_eq!(result.total_fiat_value, total_fiat(&result.entries));
        assert!(result.total_fiat_value.is_finite());
    }
}
