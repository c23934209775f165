//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the minter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::MintDefaults;

/// Root configuration for a bulk minting run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MinterConfig {
    /// Wallet RPC endpoint and credentials.
    pub wallet_rpc: WalletRpcConfig,

    /// Fields shared by every minted item.
    pub mint: MintDefaults,

    /// Input file and queue processing settings.
    pub batch: BatchConfig,

    /// Operator checkpoint behavior.
    pub checkpoint: CheckpointConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Wallet RPC connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletRpcConfig {
    /// Base URL of the wallet RPC service (e.g., "https://localhost:9256").
    pub endpoint: String,

    /// Client certificate (PEM).
    pub cert_path: Option<PathBuf>,

    /// Client private key (PEM).
    pub key_path: Option<PathBuf>,

    /// Per-call request timeout in seconds.
    pub timeout_secs: u64,

    /// Skip server certificate verification. The wallet serves a certificate
    /// signed by its own private CA.
    pub accept_invalid_certs: bool,
}

impl Default for WalletRpcConfig {
    fn default() -> Self {
        let ssl_dir = home_dir().map(|home| home.join(".chia/mainnet/config/ssl/wallet"));
        Self {
            endpoint: "https://localhost:9256".to_string(),
            cert_path: ssl_dir.as_ref().map(|dir| dir.join("private_wallet.crt")),
            key_path: ssl_dir.as_ref().map(|dir| dir.join("private_wallet.key")),
            timeout_secs: 10,
            accept_invalid_certs: true,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Batch processing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Delimited metadata file, one item per row, row 0 reserved.
    pub metadata_file: PathBuf,

    /// Read the optional target address column.
    pub targets: bool,

    /// First queue index to process. Unset or non-positive means 1.
    pub start: Option<i64>,

    /// Where the queue cursor is persisted between runs.
    pub cursor_file: Option<PathBuf>,

    /// Seconds between confirmation polls.
    pub poll_interval_secs: u64,

    /// Give up on a job after this many unresolved polls (unbounded if unset).
    pub max_poll_ticks: Option<u32>,

    /// Wallet whose newest transaction is inspected as the fallback
    /// confirmation signal.
    pub fee_wallet_id: u32,

    /// Abort startup unless the wallet reports this network.
    pub expected_network: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            metadata_file: PathBuf::from("bulk_mint_metadata.csv"),
            targets: false,
            start: None,
            cursor_file: None,
            poll_interval_secs: 10,
            max_poll_ticks: None,
            fee_wallet_id: 1,
            expected_network: None,
        }
    }
}

/// Operator checkpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Ask the operator on the console. When false every confirmation is
    /// accepted and not-ready checkpoints wait.
    pub interactive: bool,

    /// First wait after a not-ready check, in seconds.
    pub wait_base_secs: u64,

    /// Upper bound for the backoff between not-ready checks, in seconds.
    pub wait_max_secs: u64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            wait_base_secs: 10,
            wait_max_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
