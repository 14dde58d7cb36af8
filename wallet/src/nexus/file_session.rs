//! File-backed Nexus session
//!
//! Serves unified balances from a JSON dump of raw SDK records, re-read on
//! every fetch. Lets the orchestrator run offline from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use common::bridge_types::{
    NexusConnector, NexusSession, ProviderKind, ProviderSource, RawAssetRecord, WalletProvider,
};
use common::error::BalanceError;

/// Read raw records from a JSON array on disk
pub async fn read_records(path: &Path) -> Result<Vec<RawAssetRecord>, BalanceError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        BalanceError::TransportFailure(format!("failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        BalanceError::UnknownSdkError(format!("invalid balance dump {}: {}", path.display(), e))
    })
}

pub struct JsonFileConnector {
    path: PathBuf,
}

impl JsonFileConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NexusConnector for JsonFileConnector {
    async fn initialize(&self, provider: WalletProvider) -> Result<Arc<dyn NexusSession>, BalanceError> {
        if !self.path.exists() {
            return Err(BalanceError::TransportFailure(format!(
                "balance dump not found: {}",
                self.path.display()
            )));
        }

        debug!("Opened balance dump {} for {}", self.path.display(), provider.account);
        Ok(Arc::new(JsonFileSession {
            account: provider.account,
            path: self.path.clone(),
        }))
    }
}

pub struct JsonFileSession {
    account: String,
    path: PathBuf,
}

#[async_trait]
impl NexusSession for JsonFileSession {
    fn account(&self) -> String {
        self.account.clone()
    }

    async fn unified_balances(&self) -> Result<Vec<RawAssetRecord>, BalanceError> {
        read_records(&self.path).await
    }
}

/// Provider source that always has a provider ready
pub struct FixedProviderSource {
    chain_id: Option<u64>,
}

impl FixedProviderSource {
    pub fn new(chain_id: Option<u64>) -> Self {
        Self { chain_id }
    }
}

#[async_trait]
impl ProviderSource for FixedProviderSource {
    async fn provider(&self, account: &str) -> Option<WalletProvider> {
        Some(WalletProvider::new(account, self.chain_id, ProviderKind::Injected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dump_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wallet-file-session-{}-{}.json", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_session_reads_dump() {
        let path = dump_path("ok");
        fs::write(&path, r#"[{"symbol":"ETH","balance":"0.5","balanceInFiat":1000}]"#).unwrap();

        let connector = JsonFileConnector::new(&path);
        let session = connector
            .initialize(WalletProvider::new("0xabc", Some(1), ProviderKind::Injected))
            .await
            .unwrap();

        assert_eq!(session.account(), "0xabc");
        let records = session.unified_balances().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol.as_deref(), Some("ETH"));
        assert_eq!(records[0].reported_fiat(), Some(1000.0));

        fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_loosely_typed_dump_keeps_every_record() {
        let path = dump_path("loose");
        fs::write(
            &path,
            r#"[
                {"symbol":"ETH","balance":0.5,"balanceInFiat":1000,"fiatValue":999,
                 "breakdown":[{"chain":{"id":"1","name":"Ethereum"},"balance":0.5}]},
                {"symbol":"USDC","balance":"20","chain":8453,"usdValue":"20"}
            ]"#,
        )
        .unwrap();

        let records = read_records(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].balance.as_deref(), Some("0.5"));
        assert_eq!(records[0].reported_fiat(), Some(1000.0));
        assert_eq!(records[1].usd_value, Some(20.0));

        fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_error_classes() {
        let missing = JsonFileConnector::new(dump_path("missing"));
        let err = missing
            .initialize(WalletProvider::new("0xabc", None, ProviderKind::Injected))
            .await
            .err();
        assert!(matches!(err, Some(BalanceError::TransportFailure(_))));

        let path = dump_path("broken");
        fs::write(&path, "{ not an array").unwrap();
        assert!(matches!(read_records(&path).await, Err(BalanceError::UnknownSdkError(_))));
        fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_fixed_provider_source() {
        let source = FixedProviderSource::new(Some(8453));
        let provider = source.provider("0xabc").await.unwrap();
        assert_eq!(provider.chain_id, Some(8453));
        assert_eq!(provider.account, "0xabc");
    }
}
