//! Raw unified-balance records as returned by the Nexus SDK
//!
//! The SDK response is loosely typed: the same value can arrive under
//! several names and chain information comes either as a name or as a
//! descriptor. These structs accept every variant seen on the wire and leave
//! the choice between aliases to the wallet normalizer.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Serialize, Deserialize};
use serde_json::Value;

use super::chain::ChainIdRef;

/// Decode an optional field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decimal amount sent either as a string or as a JSON number
fn decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Fiat amount sent either as a JSON number or as a numeric string
fn fiat_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Structured chain descriptor inside a breakdown item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChainInfo {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<ChainIdRef>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub chain_id: Option<ChainIdRef>,
    #[serde(deserialize_with = "lenient")]
    pub network: Option<String>,
}

/// Chain reference: a plain name, a descriptor, or anything else the SDK sends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainRef {
    Name(String),
    Info(ChainInfo),
    Other(Value),
}

impl ChainRef {
    pub fn named(name: &str) -> Self {
        ChainRef::Name(name.to_string())
    }

    pub fn info(id: u64, name: &str) -> Self {
        ChainRef::Info(ChainInfo {
            id: Some(ChainIdRef::Numeric(id)),
            name: Some(name.to_string()),
            ..ChainInfo::default()
        })
    }

    /// Name carried by the reference, whichever form it takes
    pub fn name(&self) -> Option<&str> {
        match self {
            ChainRef::Name(name) => Some(name.as_str()),
            ChainRef::Info(info) => info.name.as_deref(),
            ChainRef::Other(_) => None,
        }
    }

    /// Chain id carried by a descriptor or a bare number
    pub fn id(&self) -> Option<ChainIdRef> {
        match self {
            ChainRef::Name(_) => None,
            ChainRef::Info(info) => info
                .id
                .iter()
                .chain(info.chain_id.iter())
                .find(|id| !id.is_empty())
                .cloned(),
            ChainRef::Other(value) => value.as_u64().map(ChainIdRef::Numeric),
        }
    }
}

/// Chain-scoped slice of an asset balance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakdownItem {
    pub chain: Option<ChainRef>,
    #[serde(deserialize_with = "decimal_string")]
    pub balance: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub chain_id: Option<ChainIdRef>,
    #[serde(deserialize_with = "lenient")]
    pub chain_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub network: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub contract_address: Option<String>,
    #[serde(alias = "rawBalanceMinorUnits", deserialize_with = "decimal_string")]
    pub raw_balance: Option<String>,
    #[serde(deserialize_with = "fiat_amount")]
    pub balance_in_fiat: Option<f64>,
    #[serde(deserialize_with = "fiat_amount")]
    pub usd_value: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub symbol: Option<String>,
}

impl BreakdownItem {
    pub fn new(chain: ChainRef, balance: &str) -> Self {
        Self {
            chain: Some(chain),
            balance: Some(balance.to_string()),
            ..Self::default()
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<ChainIdRef>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

/// One asset in a unified balance response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAssetRecord {
    #[serde(deserialize_with = "lenient")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub token: Option<String>,
    /// Total across all chains
    #[serde(deserialize_with = "decimal_string")]
    pub balance: Option<String>,
    #[serde(deserialize_with = "decimal_string")]
    pub amount: Option<String>,
    #[serde(deserialize_with = "decimal_string")]
    pub formatted_balance: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub decimals: Option<u32>,
    /// Fiat value of `balance`
    #[serde(deserialize_with = "fiat_amount")]
    pub balance_in_fiat: Option<f64>,
    #[serde(deserialize_with = "fiat_amount")]
    pub fiat_value: Option<f64>,
    #[serde(deserialize_with = "fiat_amount")]
    pub usd_value: Option<f64>,
    #[serde(deserialize_with = "fiat_amount")]
    pub value: Option<f64>,
    #[serde(rename = "priceUSD", deserialize_with = "fiat_amount")]
    pub price_usd: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub abstracted: Option<bool>,
    pub chain: Option<ChainRef>,
    #[serde(deserialize_with = "lenient")]
    pub chain_id: Option<ChainIdRef>,
    #[serde(deserialize_with = "lenient")]
    pub chain_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub network: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub contract_address: Option<String>,
    #[serde(alias = "rawBalanceMinorUnits", deserialize_with = "decimal_string")]
    pub raw_balance: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub breakdown: Option<Vec<BreakdownItem>>,
}

impl RawAssetRecord {
    pub fn new(symbol: &str, balance: &str) -> Self {
        Self {
            symbol: Some(symbol.to_string()),
            balance: Some(balance.to_string()),
            ..Self::default()
        }
    }

    pub fn with_fiat_value(mut self, fiat_value: f64) -> Self {
        self.balance_in_fiat = Some(fiat_value);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_breakdown(mut self, breakdown: Vec<BreakdownItem>) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<ChainIdRef>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// Fiat value of the whole record: `balanceInFiat`, else `fiatValue`
    pub fn reported_fiat(&self) -> Option<f64> {
        self.balance_in_fiat.or(self.fiat_value)
    }

    /// Breakdown items, if the record carries a non-empty breakdown
    pub fn breakdown_items(&self) -> Option<&[BreakdownItem]> {
        self.breakdown.as_deref().filter(|items| !items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sdk_shape() {
        let json = r#"{
            "symbol": "USDC",
            "balance": "100",
            "balanceInFiat": 100.0,
            "decimals": 6,
            "abstracted": true,
            "breakdown": [
                {"chain": {"id": 1, "name": "Ethereum"}, "balance": "60", "contractAddress": "0xa0b8", "rawBalance": "60000000"},
                {"chain": "Polygon", "balance": "40", "chainId": "137"}
            ]
        }"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.reported_fiat(), Some(100.0));
        assert_eq!(record.decimals, Some(6));

        let items = record.breakdown_items().unwrap();
        assert_eq!(items[0].chain, Some(ChainRef::info(1, "Ethereum")));
        assert_eq!(items[0].raw_balance.as_deref(), Some("60000000"));
        assert_eq!(items[1].chain.as_ref().and_then(|c| c.name()), Some("Polygon"));
        assert_eq!(items[1].chain_id.as_ref().and_then(|c| c.as_u64()), Some(137));
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"token": "DAI", "amount": "12.5", "fiatValue": 12.5, "priceUSD": 1.0,
                       "network": "base", "rawBalanceMinorUnits": "12500000000000000000"}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.symbol, None);
        assert_eq!(record.token.as_deref(), Some("DAI"));
        assert_eq!(record.balance_in_fiat, None);
        assert_eq!(record.reported_fiat(), Some(12.5));
        assert_eq!(record.price_usd, Some(1.0));
        assert_eq!(record.raw_balance.as_deref(), Some("12500000000000000000"));
        assert!(record.breakdown_items().is_none());
    }

    #[test]
    fn test_empty_breakdown_is_absent() {
        let record = RawAssetRecord::new("USDT", "0").with_breakdown(vec![]);
        assert!(record.breakdown_items().is_none());
    }

    #[test]
    fn test_chain_ref_accessors() {
        let info = ChainRef::Info(ChainInfo {
            chain_id: Some(ChainIdRef::Numeric(10)),
            ..ChainInfo::default()
        });
        assert_eq!(info.id(), Some(ChainIdRef::Numeric(10)));
        assert_eq!(info.name(), None);
        assert_eq!(ChainRef::named("Base").id(), None);
    }

    #[test]
    fn test_string_descriptor_id() {
        let json = r#"{"symbol": "ETH", "balance": "1",
                       "breakdown": [{"chain": {"id": "1", "name": "Ethereum"}, "balance": "1"}]}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        let chain = record.breakdown_items().unwrap()[0].chain.clone().unwrap();
        assert_eq!(chain.name(), Some("Ethereum"));
        assert_eq!(chain.id().and_then(|id| id.as_u64()), Some(1));
    }

    #[test]
    fn test_numeric_chain() {
        let json = r#"[{"symbol": "ETH", "balance": "1", "chain": 8453},
                       {"symbol": "USDC", "balance": "2", "chain": true}]"#;
        let records: Vec<RawAssetRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chain.as_ref().and_then(ChainRef::id), Some(ChainIdRef::Numeric(8453)));
        assert_eq!(records[1].chain.as_ref().and_then(ChainRef::id), None);
        assert_eq!(records[1].chain.as_ref().and_then(ChainRef::name), None);
    }

    #[test]
    fn test_numeric_balances() {
        let json = r#"{"symbol": "ETH", "balance": 0.5, "balanceInFiat": "1000.5", "rawBalance": 500000,
                       "breakdown": [{"chain": "Base", "balance": 0.5}]}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.balance.as_deref(), Some("0.5"));
        assert_eq!(record.raw_balance.as_deref(), Some("500000"));
        assert_eq!(record.reported_fiat(), Some(1000.5));
        assert_eq!(record.breakdown_items().unwrap()[0].balance.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_both_fiat_fields() {
        let json = r#"{"symbol": "ETH", "balance": "1", "balanceInFiat": null, "fiatValue": 7.5}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.reported_fiat(), Some(7.5));

        let json = r#"{"symbol": "ETH", "balance": "1", "balanceInFiat": 3, "fiatValue": 7.5}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.reported_fiat(), Some(3.0));
    }

    #[test]
    fn test_mistyped_fields_are_dropped() {
        let json = r#"{"symbol": 42, "token": "DAI", "balance": {"v": 1}, "amount": "3",
                       "decimals": "six", "abstracted": "yes", "chainId": -5}"#;
        let record: RawAssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.symbol, None);
        assert_eq!(record.token.as_deref(), Some("DAI"));
        assert_eq!(record.balance, None);
        assert_eq!(record.amount.as_deref(), Some("3"));
        assert_eq!(record.decimals, None);
        assert_eq!(record.abstracted, None);
        assert_eq!(record.chain_id, None);
    }
}
