//! Error taxonomy for the balance fetch path

use thiserror::Error;

/// Message shown when no wallet account is connected
pub const WALLET_NOT_CONNECTED: &str = "Please connect your wallet first";

/// Message shown when the wallet never exposed a provider handle
pub const WALLET_CLIENT_NOT_READY: &str =
    "Wallet client is not ready yet. Please wait a moment and try again.";

const FALLBACK_SUFFIX: &str = ", showing demo data";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    /// No connected account or no provider to initialize the SDK with
    #[error("Session not ready: {0}")]
    SessionNotReady(String),
    #[error("Timed out: {0}")]
    Timeout(String),
    #[error("Transport failure: {0}")]
    TransportFailure(String),
    #[error("Nexus SDK error: {0}")]
    UnknownSdkError(String),
}

impl BalanceError {
    /// Map a raw SDK rejection message onto the taxonomy
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout(message.to_string())
        } else if lower.contains("failed to fetch") || lower.contains("network") {
            Self::TransportFailure(message.to_string())
        } else {
            Self::UnknownSdkError(message.to_string())
        }
    }

    /// Number of attempts this error class is allowed, first try included
    pub fn attempt_budget(&self, configured: u32) -> u32 {
        match self {
            Self::SessionNotReady(_) => 1,
            Self::Timeout(_) | Self::TransportFailure(_) => configured.max(1),
            Self::UnknownSdkError(_) => configured.clamp(1, 2),
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::SessionNotReady(_))
    }

    /// Text for the inline warning banner
    pub fn user_message(&self, with_fallback: bool) -> String {
        let suffix = if with_fallback { FALLBACK_SUFFIX } else { "" };
        match self {
            Self::SessionNotReady(reason) if reason.is_empty() => WALLET_NOT_CONNECTED.to_string(),
            Self::SessionNotReady(reason) => reason.clone(),
            Self::Timeout(_) => format!("Nexus SDK API timeout{}", suffix),
            Self::TransportFailure(_) => {
                format!("Network error - Nexus SDK API unavailable{}", suffix)
            }
            Self::UnknownSdkError(msg) => format!("Nexus SDK error: {}{}", msg, suffix),
        }
    }
}
