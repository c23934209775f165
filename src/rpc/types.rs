//! Wallet RPC wire types and error definitions.

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while talking to the wallet RPC service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The call did not complete within the per-call timeout.
    #[error("{operation}: RPC timeout after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// Connection refused, DNS or TLS failure.
    #[error("{operation}: wallet unreachable: {reason}")]
    Unreachable { operation: String, reason: String },

    /// Non-2xx status or a well-formed error body.
    #[error("{operation}: remote error (status {status}): {message}")]
    Remote {
        operation: String,
        status: u16,
        message: String,
    },

    /// The response could not be parsed into the expected shape.
    #[error("{operation}: malformed response: {reason}")]
    Malformed { operation: String, reason: String },

    /// The client could not be built (bad endpoint or credentials).
    #[error("RPC client setup failed: {0}")]
    Client(String),
}

impl RpcError {
    /// True for failures where the service produced no usable answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RpcError::Timeout { .. } | RpcError::Unreachable { .. } | RpcError::Malformed { .. }
        )
    }
}

/// Result type for wallet RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Transport seam: send a request object to a named remote operation.
///
/// Implementations never retry; retry policy belongs to callers.
pub trait WalletRpc {
    fn call(
        &self,
        operation: &str,
        payload: Value,
    ) -> impl Future<Output = RpcResult<Value>> + Send;
}

/// `get_network_info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkInfo {
    pub network_name: String,
}

/// `get_sync_status` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SyncStatus {
    pub synced: bool,
    #[serde(default)]
    pub syncing: bool,
}

/// `nft_mint_nft` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MintResponse {
    pub nft_id: String,
}

/// `get_transactions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// One wallet transaction; only the confirmation flag matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub confirmed: bool,
}

/// `nft_get_info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NftInfoResponse {
    pub nft_info: NftInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftInfo {
    pub mint_height: u64,
}
