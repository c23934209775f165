//! Observability port for the minting core.
//!
//! The orchestrator reports every state transition as a [`MintEvent`]. The
//! core never writes to the console itself; [`TracingObserver`] turns events
//! into log lines and metrics, tests record them.

use std::time::Duration;

use crate::health::LivenessState;
use crate::observability::metrics;

/// A state transition worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintEvent {
    /// Startup check of the wallet. `network` is known only when synced.
    WalletChecked {
        state: LivenessState,
        network: Option<String>,
    },
    /// The queue was built from the metadata file.
    QueueBuilt {
        items: usize,
        actionable: usize,
        cursor: usize,
    },
    /// The liveness gate refused a submission. `index` is `None` at startup.
    NotReady {
        index: Option<usize>,
        state: LivenessState,
    },
    /// Pausing before the next liveness check.
    Waiting { delay: Duration, attempt: u32 },
    Submitting { index: usize, uri: String },
    Submitted { index: usize, remote_id: String },
    /// A mint accepted by an earlier run is confirmed instead of resubmitted.
    Resumed { index: usize, remote_id: String },
    /// The mint call failed; the item was not advanced.
    SubmissionFailed { index: usize, error: String },
    /// One unresolved poll tick.
    Polling {
        index: usize,
        remote_id: String,
        elapsed: Duration,
        liveness: LivenessState,
    },
    Minted {
        index: usize,
        remote_id: String,
        height: u64,
        elapsed: Duration,
    },
    Failed {
        index: usize,
        reason: String,
        elapsed: Duration,
    },
    CursorAdvanced { cursor: usize },
    Cancelled { cursor: usize },
    Finished {
        minted: usize,
        failed: usize,
        cursor: usize,
    },
}

/// Receiver of mint events.
pub trait MintObserver {
    fn on_event(&self, event: &MintEvent);
}

impl<T: MintObserver + ?Sized> MintObserver for &T {
    fn on_event(&self, event: &MintEvent) {
        (**self).on_event(event)
    }
}

/// Emits events as structured tracing records and metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MintObserver for TracingObserver {
    fn on_event(&self, event: &MintEvent) {
        match event {
            MintEvent::WalletChecked { state, network } => match network {
                Some(network) => tracing::info!(%state, network = %network, "Wallet is on {}", network),
                None => tracing::warn!(%state, "Wallet is not synced"),
            },
            MintEvent::QueueBuilt {
                items,
                actionable,
                cursor,
            } => {
                tracing::info!(items, actionable, cursor, "{} NFTs queued for minting", actionable);
                metrics::record_cursor(*cursor);
            }
            MintEvent::NotReady { index, state } => {
                tracing::warn!(index = ?index, %state, "Wallet is not synced, minting paused");
                metrics::record_not_ready(*state);
            }
            MintEvent::Waiting { delay, attempt } => {
                tracing::info!(delay_secs = delay.as_secs(), attempt, "Waiting before rechecking wallet");
            }
            MintEvent::Submitting { index, uri } => {
                tracing::info!(index, uri = %uri, "Submitting NFT #{}", index);
            }
            MintEvent::Submitted { index, remote_id } => {
                tracing::info!(index, remote_id = %remote_id, "Mint submitted");
                metrics::record_submission(true);
            }
            MintEvent::Resumed { index, remote_id } => {
                tracing::info!(index, remote_id = %remote_id, "Resuming confirmation of earlier mint");
            }
            MintEvent::SubmissionFailed { index, error } => {
                tracing::error!(index, error = %error, "Mint submission failed");
                metrics::record_submission(false);
            }
            MintEvent::Polling {
                index,
                remote_id,
                elapsed,
                liveness,
            } => {
                tracing::info!(
                    index,
                    remote_id = %remote_id,
                    elapsed_secs = elapsed.as_secs(),
                    liveness = %liveness,
                    "NFT #{} is minting, {}s elapsed",
                    index,
                    elapsed.as_secs()
                );
            }
            MintEvent::Minted {
                index,
                remote_id,
                height,
                elapsed,
            } => {
                tracing::info!(
                    index,
                    remote_id = %remote_id,
                    height,
                    elapsed_secs = elapsed.as_secs(),
                    "Minting SUCCEEDED for NFT #{}",
                    index
                );
                metrics::record_job_outcome("minted", *elapsed);
            }
            MintEvent::Failed {
                index,
                reason,
                elapsed,
            } => {
                tracing::error!(
                    index,
                    reason = %reason,
                    elapsed_secs = elapsed.as_secs(),
                    "Minting transaction for NFT #{} cannot be identified, monitor the wallet",
                    index
                );
                metrics::record_job_outcome("failed", *elapsed);
            }
            MintEvent::CursorAdvanced { cursor } => {
                tracing::debug!(cursor, "Cursor advanced");
                metrics::record_cursor(*cursor);
            }
            MintEvent::Cancelled { cursor } => {
                tracing::warn!(cursor, "Mint canceled by operator");
            }
            MintEvent::Finished {
                minted,
                failed,
                cursor,
            } => {
                tracing::info!(minted, failed, cursor, "Minting run finished");
            }
        }
    }
}
