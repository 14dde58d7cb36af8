//! Balance refresh phase
//!
//! This module defines the `RefreshPhase` enum tracking one balance refresh
//! cycle, along with helpers for terminal and failure checks.

use serde::{Serialize, Deserialize};
use std::fmt;

/// Phase of a balance refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RefreshPhase {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for a wallet provider and an SDK session
    Initializing,
    /// Balance request in flight
    Fetching,
    /// Latest result published
    Ready,
    /// Refresh failed with a user facing message
    Failed(String),
}

impl RefreshPhase {
    /// Check if the refresh has finished (Ready or Failed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }

    /// Phases during which a loading indicator is shown
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Initializing | Self::Fetching)
    }

    /// Get failure reason if available
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Initializing => write!(f, "Initializing"),
            Self::Fetching => write!(f, "Fetching"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}
