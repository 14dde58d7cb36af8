//! Nexus SDK ports
//!
//! This module defines the traits through which the balance core talks to
//! the wallet connection layer and the Nexus bridge SDK.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, Deserialize};

use super::balance::RawAssetRecord;
use crate::error::BalanceError;

/// Where a provider handle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Wallet client from the connection library
    WalletClient,
    /// Connector client from the connection library
    ConnectorClient,
    /// Provider injected by a browser extension
    Injected,
}

/// EIP-1193 style provider handle for one connected account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletProvider {
    pub account: String,
    pub chain_id: Option<u64>,
    pub kind: ProviderKind,
}

impl WalletProvider {
    pub fn new(account: &str, chain_id: Option<u64>, kind: ProviderKind) -> Self {
        Self {
            account: account.to_string(),
            chain_id,
            kind,
        }
    }
}

/// Source of provider handles
#[async_trait]
pub trait ProviderSource: Send + Sync + 'static {
    /// Provider for the account, if the wallet has exposed one yet
    async fn provider(&self, account: &str) -> Option<WalletProvider>;
}

/// An initialized SDK session bound to one account
#[async_trait]
pub trait NexusSession: Send + Sync + 'static {
    /// Account the session was initialized for
    fn account(&self) -> String;

    /// Fetch the unified balance across all chains
    async fn unified_balances(&self) -> Result<Vec<RawAssetRecord>, BalanceError>;
}

/// Creates SDK sessions
#[async_trait]
pub trait NexusConnector: Send + Sync + 'static {
    /// Initialize the SDK against a provider
    ///
    /// # Arguments
    /// * `provider` - Provider handle for the connected account
    ///
    /// # Returns
    /// A session bound to `provider.account`
    async fn initialize(&self, provider: WalletProvider) -> Result<Arc<dyn NexusSession>, BalanceError>;
}
