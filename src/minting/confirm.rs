//! Confirmation polling.
//!
//! One probe per poll tick:
//! 1. Look the asset up by remote id. A mint height means it is final.
//! 2. Otherwise check the newest transaction of the fee wallet. A wallet
//!    that cannot produce it (error body, empty list) means the minting
//!    transaction cannot be located. Anything else is still in progress.

use crate::minting::job::PollObservation;
use crate::rpc::{RpcError, WalletApi, WalletRpc};

/// Message recorded when the minting transaction cannot be found.
pub const UNIDENTIFIED_TRANSACTION: &str = "Error identifying minting transaction";

/// Asks the wallet whether a submitted mint has resolved.
#[derive(Debug)]
pub struct ConfirmationProbe<R> {
    wallet: WalletApi<R>,
    fee_wallet_id: u32,
}

impl<R: WalletRpc> ConfirmationProbe<R> {
    pub fn new(wallet: WalletApi<R>, fee_wallet_id: u32) -> Self {
        Self {
            wallet,
            fee_wallet_id,
        }
    }

    pub async fn observe(&self, remote_id: &str) -> PollObservation {
        match self.wallet.nft_mint_height(remote_id).await {
            Ok(height) => return PollObservation::Indexed { height },
            Err(e) => tracing::debug!(remote_id, error = %e, "Asset not indexed yet"),
        }

        match self.wallet.latest_transaction_confirmed(self.fee_wallet_id).await {
            Ok(Some(confirmed)) => {
                tracing::debug!(remote_id, confirmed, "Minting transaction located");
                PollObservation::InProgress
            }
            Ok(None) => PollObservation::Unlocatable {
                reason: format!("{}: wallet lists no transactions", UNIDENTIFIED_TRANSACTION),
            },
            Err(RpcError::Remote { message, .. }) => PollObservation::Unlocatable {
                reason: format!("{}: {}", UNIDENTIFIED_TRANSACTION, message),
            },
            Err(e) => {
                tracing::warn!(remote_id, error = %e, "Transaction lookup failed, will poll again");
                PollObservation::InProgress
            }
        }
    }
}
