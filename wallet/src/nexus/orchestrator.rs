//! Refresh orchestrator for the unified balance view.
//!
//! Owns one Nexus SDK session per connected account, drives a refresh cycle
//! `Idle -> Initializing -> Fetching -> Ready | Failed` and publishes every
//! transition through a watch channel. Each refresh takes a sequence number;
//! a result is published only while its request is the latest one issued and
//! the account has not changed.

// Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Third party imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

// Internal imports
use common::bridge_types::{
    poll_for, retry_with_backoff, NexusConnector, NexusSession, ProviderSource, RefreshPhase,
};
use common::error::{BalanceError, WALLET_CLIENT_NOT_READY};

use crate::balance::{fallback_result, normalize_balances, CurrentChainBalance, UnifiedBalanceResult};
use crate::config::WalletConfig;

/// Snapshot published to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceState {
    pub phase: RefreshPhase,
    pub result: Option<UnifiedBalanceResult>,
    pub is_loading: bool,
    /// User facing message of the last failure
    pub error: Option<String>,
    pub account: Option<String>,
    pub request_seq: u64,
    pub updated_at: DateTime<Utc>,
}

impl Default for BalanceState {
    fn default() -> Self {
        Self {
            phase: RefreshPhase::Idle,
            result: None,
            is_loading: false,
            error: None,
            account: None,
            request_seq: 0,
            updated_at: Utc::now(),
        }
    }
}

impl BalanceState {
    fn enter(&mut self, phase: RefreshPhase, seq: u64) {
        self.is_loading = phase.is_loading();
        self.phase = phase;
        self.request_seq = seq;
        self.updated_at = Utc::now();
    }
}

#[derive(Default)]
struct WalletContext {
    account: Option<String>,
    chain_id: Option<u64>,
    current_chain: Option<CurrentChainBalance>,
    session: Option<Arc<dyn NexusSession>>,
}

pub struct BalanceOrchestrator {
    connector: Arc<dyn NexusConnector>,
    providers: Arc<dyn ProviderSource>,
    config: WalletConfig,
    context: RwLock<WalletContext>,
    // Serializes SDK initialization so one account never gets two sessions
    init_lock: Mutex<()>,
    seq: AtomicU64,
    state_tx: watch::Sender<BalanceState>,
}

impl BalanceOrchestrator {
    pub fn new(
        connector: Arc<dyn NexusConnector>,
        providers: Arc<dyn ProviderSource>,
        config: WalletConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(BalanceState::default());
        Self {
            connector,
            providers,
            config,
            context: RwLock::new(WalletContext::default()),
            init_lock: Mutex::new(()),
            seq: AtomicU64::new(0),
            state_tx,
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> BalanceState {
        self.state_tx.borrow().clone()
    }

    /// Make `account` the active wallet account.
    ///
    /// Invalidates in-flight refreshes. A session or result that belongs to a
    /// different account is dropped.
    pub async fn connect(&self, account: &str, chain_id: Option<u64>) {
        let seq = self.next_seq();
        let switched = {
            let mut ctx = self.context.write().await;
            let switched = ctx.account.as_deref() != Some(account);
            if switched {
                ctx.session = None;
            }
            ctx.account = Some(account.to_string());
            ctx.chain_id = chain_id;
            switched
        };

        info!("Wallet connected: {} (chain {:?})", account, chain_id);
        self.state_tx.send_modify(|state| {
            if switched {
                state.result = None;
            }
            state.error = None;
            state.account = Some(account.to_string());
            state.enter(RefreshPhase::Idle, seq);
        });
    }

    pub async fn disconnect(&self) {
        let seq = self.next_seq();
        {
            let mut ctx = self.context.write().await;
            *ctx = WalletContext::default();
        }

        info!("Wallet disconnected");
        self.state_tx.send_modify(|state| {
            state.result = None;
            state.error = None;
            state.account = None;
            state.enter(RefreshPhase::Idle, seq);
        });
    }

    /// Native balance of the connected chain, merged into the next refresh.
    /// A balance without a chain id is attributed to the connected chain.
    pub async fn set_current_chain_balance(&self, balance: Option<CurrentChainBalance>) {
        let mut ctx = self.context.write().await;
        let connected_chain = ctx.chain_id;
        ctx.current_chain = balance.map(|mut balance| {
            if balance.chain_id.is_none() {
                balance.chain_id = connected_chain;
            }
            balance
        });
    }

    /// Leave `Failed` and run a new refresh
    pub async fn retry(&self) {
        let account = self.context.read().await.account.clone();
        self.state_tx.send_if_modified(|state| {
            if !matches!(state.phase, RefreshPhase::Failed(_)) || state.account != account {
                return false;
            }
            state.error = None;
            let seq = state.request_seq;
            state.enter(RefreshPhase::Idle, seq);
            true
        });
        self.refresh().await;
    }

    /// Run one fetch-normalize cycle. Failures end up in the published state.
    pub async fn refresh(&self) {
        let seq = self.next_seq();
        let (account, current_chain) = {
            let ctx = self.context.read().await;
            (ctx.account.clone(), ctx.current_chain.clone())
        };

        let account = match account {
            Some(account) => account,
            None => {
                self.fail(seq, None, BalanceError::SessionNotReady(String::new()));
                return;
            }
        };

        debug!("Refresh #{} started for {}", seq, account);
        match self.run_refresh(seq, &account, current_chain.as_ref()).await {
            Ok(result) => {
                let entries = result.entries.len();
                let published = self.publish(seq, Some(&account), |state| {
                    state.result = Some(result);
                    state.error = None;
                    state.enter(RefreshPhase::Ready, seq);
                });
                if published {
                    info!("Refresh #{} ready: {} entries", seq, entries);
                }
            }
            Err(err) => self.fail(seq, Some(&account), err),
        }
    }

    async fn run_refresh(
        &self,
        seq: u64,
        account: &str,
        current_chain: Option<&CurrentChainBalance>,
    ) -> Result<UnifiedBalanceResult, BalanceError> {
        self.publish(seq, Some(account), |state| {
            state.error = None;
            state.enter(RefreshPhase::Initializing, seq);
        });
        let session = self.ensure_session(account).await?;

        self.publish(seq, Some(account), |state| state.enter(RefreshPhase::Fetching, seq));
        let records = retry_with_backoff("fetch unified balances", &self.config.retry, |_| {
            session.unified_balances()
        })
        .await?;

        Ok(normalize_balances(&records, current_chain))
    }

    /// Session for `account`, initializing the SDK on first use
    async fn ensure_session(&self, account: &str) -> Result<Arc<dyn NexusSession>, BalanceError> {
        let _guard = self.init_lock.lock().await;

        if let Some(session) = self.cached_session(account).await {
            return Ok(session);
        }

        let provider = poll_for("wallet provider", &self.config.provider_poll, || {
            self.providers.provider(account)
        })
        .await
        .ok_or_else(|| BalanceError::SessionNotReady(WALLET_CLIENT_NOT_READY.to_string()))?;

        debug!("Initializing Nexus SDK for {} via {:?}", account, provider.kind);
        let session = retry_with_backoff("initialize Nexus SDK", &self.config.retry, |_| {
            self.connector.initialize(provider.clone())
        })
        .await?;

        let mut ctx = self.context.write().await;
        if ctx.account.as_deref() == Some(account) {
            ctx.session = Some(session.clone());
        }
        info!("Nexus SDK initialized for {}", account);
        Ok(session)
    }

    async fn cached_session(&self, account: &str) -> Option<Arc<dyn NexusSession>> {
        let ctx = self.context.read().await;
        ctx.session
            .as_ref()
            .filter(|session| session.account() == account)
            .cloned()
    }

    fn fail(&self, seq: u64, account: Option<&str>, err: BalanceError) {
        let with_fallback = self.config.fallback_enabled && err.is_retryable();
        let message = err.user_message(with_fallback);
        // a connected wallet whose client never came up still gets an empty view
        let result = if with_fallback {
            Some(fallback_result())
        } else if account.is_some() && !err.is_retryable() {
            Some(UnifiedBalanceResult::empty())
        } else {
            None
        };

        let published = self.publish(seq, account, |state| {
            state.result = result;
            state.error = Some(message.clone());
            state.enter(RefreshPhase::Failed(message.clone()), seq);
        });
        if published {
            warn!("Refresh #{} failed: {}", seq, err);
        } else {
            debug!("Refresh #{} failed after being superseded: {}", seq, err);
        }
    }

    /// Apply `update` only if `seq` is still the latest request for `account`
    fn publish<F>(&self, seq: u64, account: Option<&str>, update: F) -> bool
    where
        F: FnOnce(&mut BalanceState),
    {
        self.state_tx.send_if_modified(|state| {
            if self.seq.load(Ordering::SeqCst) != seq || state.account.as_deref() != account {
                debug!("Discarding stale update for request #{}", seq);
                return false;
            }
            update(state);
            true
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}
