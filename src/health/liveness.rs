//! Liveness gate.
//!
//! # Responsibilities
//! - Query the wallet's sync state on demand
//! - Classify the wallet as ready or not ready for a submission
//!
//! # State Mapping
//! ```text
//! call failed                      → Unreachable
//! synced=false, syncing=true       → Syncing
//! synced=false, syncing=false      → NotSynced
//! synced=true                      → Synced   (the only ready state)
//! ```
//!
//! The result is never cached: every submission and every poll tick asks
//! again.

use std::fmt;

use crate::rpc::{RpcResult, WalletApi, WalletRpc};

/// Readiness of the wallet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LivenessState {
    Synced,
    Syncing,
    NotSynced,
    Unreachable,
}

impl LivenessState {
    /// Only a synced wallet may receive a new submission.
    pub fn is_ready(self) -> bool {
        self == LivenessState::Synced
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LivenessState::Synced => "synced",
            LivenessState::Syncing => "syncing",
            LivenessState::NotSynced => "not_synced",
            LivenessState::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for LivenessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness check in front of every submission.
#[derive(Debug)]
pub struct LivenessGate<R> {
    wallet: WalletApi<R>,
}

impl<R: WalletRpc> LivenessGate<R> {
    pub fn new(wallet: WalletApi<R>) -> Self {
        Self { wallet }
    }

    /// Refresh and classify the wallet's sync state.
    pub async fn check_sync(&self) -> LivenessState {
        match self.wallet.sync_status().await {
            Ok(status) if status.synced => LivenessState::Synced,
            Ok(status) if status.syncing => LivenessState::Syncing,
            Ok(_) => LivenessState::NotSynced,
            Err(e) => {
                tracing::warn!(error = %e, "Wallet RPC cannot be reached to verify sync status");
                LivenessState::Unreachable
            }
        }
    }

    /// Name of the network the wallet is on. For display and confirmation
    /// only, never for gating.
    pub async fn check_network(&self) -> RpcResult<String> {
        self.wallet.network_name().await
    }
}
