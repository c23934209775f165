//! Typed wallet operations on top of the raw RPC transport.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::metadata::MetadataRecord;
use crate::rpc::types::{
    MintResponse, NetworkInfo, NftInfoResponse, RpcError, RpcResult, SyncStatus,
    TransactionsResponse, WalletRpc,
};

/// Operation names understood by the wallet RPC service.
pub mod ops {
    pub const GET_NETWORK_INFO: &str = "get_network_info";
    pub const GET_SYNC_STATUS: &str = "get_sync_status";
    pub const NFT_MINT_NFT: &str = "nft_mint_nft";
    pub const GET_TRANSACTIONS: &str = "get_transactions";
    pub const NFT_GET_INFO: &str = "nft_get_info";
}

/// Cheap-to-clone handle exposing the wallet operations the minter uses.
#[derive(Debug)]
pub struct WalletApi<R> {
    rpc: Arc<R>,
}

impl<R> Clone for WalletApi<R> {
    fn clone(&self) -> Self {
        Self {
            rpc: self.rpc.clone(),
        }
    }
}

impl<R: WalletRpc> WalletApi<R> {
    pub fn new(rpc: R) -> Self {
        Self { rpc: Arc::new(rpc) }
    }

    /// Access the underlying transport.
    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Name of the network the wallet is connected to.
    pub async fn network_name(&self) -> RpcResult<String> {
        let info: NetworkInfo = self.request(ops::GET_NETWORK_INFO, json!({})).await?;
        Ok(info.network_name)
    }

    pub async fn sync_status(&self) -> RpcResult<SyncStatus> {
        self.request(ops::GET_SYNC_STATUS, json!({})).await
    }

    /// Submit one mint request. Returns the remote identifier of the new asset.
    pub async fn mint_nft(&self, record: &MetadataRecord) -> RpcResult<String> {
        let payload = serde_json::to_value(record).map_err(|e| RpcError::Malformed {
            operation: ops::NFT_MINT_NFT.to_string(),
            reason: format!("request encoding failed: {}", e),
        })?;
        let response: MintResponse = self.request(ops::NFT_MINT_NFT, payload).await?;
        Ok(response.nft_id)
    }

    /// Confirmation flag of the wallet's most recent transaction, or `None`
    /// when the wallet lists no transactions at all.
    pub async fn latest_transaction_confirmed(&self, wallet_id: u32) -> RpcResult<Option<bool>> {
        let payload = json!({
            "wallet_id": wallet_id,
            "start": 0,
            "stop": 1,
            "reverse": false,
        });
        let response: TransactionsResponse = self.request(ops::GET_TRANSACTIONS, payload).await?;
        Ok(response.transactions.first().map(|tx| tx.confirmed))
    }

    /// On-chain inclusion height of a minted asset.
    pub async fn nft_mint_height(&self, coin_id: &str) -> RpcResult<u64> {
        let response: NftInfoResponse = self
            .request(ops::NFT_GET_INFO, json!({ "coin_id": coin_id }))
            .await?;
        Ok(response.nft_info.mint_height)
    }

    async fn request<T: DeserializeOwned>(&self, operation: &str, payload: Value) -> RpcResult<T> {
        let value = self.rpc.call(operation, payload).await?;
        serde_json::from_value(value).map_err(|e| RpcError::Malformed {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}
