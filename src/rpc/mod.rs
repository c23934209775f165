//! Wallet RPC subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (endpoint, certificate paths, timeout)
//!     → client.rs (HTTPS JSON transport, client-certificate auth)
//!     → wallet.rs (typed operations: sync, network, mint, poll)
//!     → liveness gate and mint jobs
//! ```
//!
//! # Design Decisions
//! - Every call has a timeout; there is no other deadline
//! - The transport never retries; callers own retry policy
//! - `"success": false` bodies are classified as remote errors

pub mod client;
pub mod types;
pub mod wallet;

pub use client::RpcClient;
pub use types::{RpcError, RpcResult, SyncStatus, WalletRpc};
pub use wallet::WalletApi;
