//! Queued minting orchestrator.
//!
//! Drives the queue from its cursor to the end, one job at a time:
//!
//! ```text
//! for each item at/after the cursor:
//!     liveness gate ── not Synced ──▶ operator checkpoint (proceed / wait / cancel)
//!         │ Synced
//!         ▼
//!     submit ── failed ──▶ operator checkpoint, back to the gate (never resubmitted blindly)
//!         │ remote id
//!         ▼
//!     poll every interval until Minted or Failed (no cancellation here)
//!         │
//!         ▼
//!     advance and persist the cursor (Minted and Failed alike)
//! ```
//!
//! The remote id is written to the cursor file as soon as the wallet accepts
//! a mint. A run resumed with an in-flight id polls that id for the item at
//! the cursor instead of submitting it again.
//!
//! Polling has no overall deadline unless `max_poll_ticks` is set: on-chain
//! confirmation latency is unbounded, so a wallet that never indexes the
//! asset keeps the run waiting on that item.

use std::time::Duration;

use crate::config::MinterConfig;
use crate::error::{MinterError, MinterResult};
use crate::health::{LivenessGate, LivenessState};
use crate::lifecycle::checkpoint::{Checkpoint, Decision, OperatorPrompt};
use crate::lifecycle::clock::Clock;
use crate::metadata::MetadataRecord;
use crate::minting::confirm::ConfirmationProbe;
use crate::minting::job::{JobState, MintJob, PollObservation};
use crate::observability::{MintEvent, MintObserver};
use crate::queue::{CursorStore, MintQueue};
use crate::resilience::WaitBackoff;
use crate::rpc::{WalletApi, WalletRpc};

/// Timing and polling knobs of the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub poll_interval: Duration,
    pub max_poll_ticks: Option<u32>,
    pub fee_wallet_id: u32,
    pub wait_base: Duration,
    pub wait_max: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(config: &MinterConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.batch.poll_interval_secs),
            max_poll_ticks: config.batch.max_poll_ticks,
            fee_wallet_id: config.batch.fee_wallet_id,
            wait_base: Duration::from_secs(config.checkpoint.wait_base_secs),
            wait_max: Duration::from_secs(config.checkpoint.wait_max_secs),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            max_poll_ticks: None,
            fee_wallet_id: 1,
            wait_base: Duration::from_secs(10),
            wait_max: Duration::from_secs(60),
        }
    }
}

/// Whether the run continues after a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every item from the cursor to the end was resolved.
    Completed,
    /// The operator stopped the run at a checkpoint.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedItem {
    pub index: usize,
    pub remote_id: String,
    pub height: u64,
}

/// An item left unresolved for operator follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub index: usize,
    pub remote_id: String,
    pub reason: String,
}

/// Terminal record of a run. Jobs themselves are discarded once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub submitted: usize,
    pub minted: Vec<MintedItem>,
    pub failed: Vec<FailedItem>,
    pub final_cursor: usize,
}

impl RunSummary {
    fn new(cursor: usize) -> Self {
        Self {
            outcome: RunOutcome::Completed,
            submitted: 0,
            minted: Vec::new(),
            failed: Vec::new(),
            final_cursor: cursor,
        }
    }

    /// Summary of a run cancelled before minting started.
    pub fn cancelled(cursor: usize) -> Self {
        Self {
            outcome: RunOutcome::Cancelled,
            ..Self::new(cursor)
        }
    }
}

/// How one queue item ended.
enum ItemOutcome {
    Minted(MintedItem),
    Failed(FailedItem),
    Cancelled,
}

/// Drives the mint queue through the job state machine.
pub struct Orchestrator<R, C, P, O> {
    wallet: WalletApi<R>,
    gate: LivenessGate<R>,
    probe: ConfirmationProbe<R>,
    clock: C,
    prompt: P,
    observer: O,
    settings: OrchestratorSettings,
    backoff: WaitBackoff,
    cursor_store: Option<CursorStore>,
    in_flight: Option<(usize, String)>,
}

impl<R, C, P, O> Orchestrator<R, C, P, O>
where
    R: WalletRpc,
    C: Clock,
    P: OperatorPrompt,
    O: MintObserver,
{
    pub fn new(
        wallet: WalletApi<R>,
        clock: C,
        prompt: P,
        observer: O,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            gate: LivenessGate::new(wallet.clone()),
            probe: ConfirmationProbe::new(wallet.clone(), settings.fee_wallet_id),
            wallet,
            clock,
            prompt,
            observer,
            backoff: WaitBackoff::new(settings.wait_base, settings.wait_max),
            settings,
            cursor_store: None,
            in_flight: None,
        }
    }

    /// Persist the cursor after every resolved item.
    pub fn with_cursor_store(mut self, store: Option<CursorStore>) -> Self {
        self.cursor_store = store;
        self
    }

    /// Resume confirmation of a mint already accepted for the item at `index`.
    pub fn with_in_flight(mut self, in_flight: Option<(usize, String)>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn emit(&self, event: MintEvent) {
        self.observer.on_event(&event);
    }

    /// Startup check: wait for a synced wallet and report its network.
    ///
    /// A wallet that is not ready is not fatal. The operator may wait, cancel
    /// or proceed anyway, since every submission is gated again. A failed
    /// network lookup counts as an unreachable wallet. While an expected
    /// network still has to be verified, proceeding only re-checks.
    pub async fn confirm_network(&mut self, expected: Option<&str>) -> MinterResult<Flow> {
        loop {
            let state = match self.gate.check_sync().await {
                LivenessState::Synced => match self.gate.check_network().await {
                    Ok(network) => {
                        self.backoff.reset();
                        self.emit(MintEvent::WalletChecked {
                            state: LivenessState::Synced,
                            network: Some(network.clone()),
                        });
                        if let Some(expected) = expected {
                            if network != expected {
                                return Err(MinterError::NetworkMismatch {
                                    expected: expected.to_string(),
                                    actual: network,
                                });
                            }
                        }
                        return Ok(Flow::Continue);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Wallet RPC cannot be reached to verify network");
                        LivenessState::Unreachable
                    }
                },
                state => state,
            };

            self.emit(MintEvent::WalletChecked {
                state,
                network: None,
            });
            match self.not_ready(None, state).await {
                Decision::Proceed if expected.is_none() => return Ok(Flow::Continue),
                Decision::Proceed => {}
                Decision::Wait => self.pause().await,
                Decision::Cancel => return Ok(Flow::Cancelled),
            }
        }
    }

    /// Yes/no confirmation before a stage of the run.
    pub async fn confirm(&mut self, checkpoint: Checkpoint) -> Flow {
        match self.prompt.decide(&checkpoint).await {
            Decision::Proceed => Flow::Continue,
            Decision::Wait | Decision::Cancel => Flow::Cancelled,
        }
    }

    /// Process the queue from its cursor to the end.
    pub async fn run(&mut self, queue: &mut MintQueue) -> MinterResult<RunSummary> {
        let mut summary = RunSummary::new(queue.cursor());

        if queue.actionable() == 0 {
            tracing::info!(
                cursor = queue.cursor(),
                items = queue.len(),
                "Nothing to mint at or after the cursor"
            );
        }

        while let Some((index, record)) = queue.current() {
            match self.process(index, record, &mut summary).await? {
                ItemOutcome::Minted(item) => summary.minted.push(item),
                ItemOutcome::Failed(item) => summary.failed.push(item),
                ItemOutcome::Cancelled => {
                    summary.outcome = RunOutcome::Cancelled;
                    summary.final_cursor = queue.cursor();
                    self.persist_cursor(queue.cursor());
                    self.emit(MintEvent::Cancelled {
                        cursor: queue.cursor(),
                    });
                    return Ok(summary);
                }
            }

            queue.advance();
            self.persist_cursor(queue.cursor());
            self.emit(MintEvent::CursorAdvanced {
                cursor: queue.cursor(),
            });
        }

        summary.final_cursor = queue.cursor();
        self.emit(MintEvent::Finished {
            minted: summary.minted.len(),
            failed: summary.failed.len(),
            cursor: summary.final_cursor,
        });
        Ok(summary)
    }

    /// Take one item from Pending to a terminal state.
    async fn process(
        &mut self,
        index: usize,
        record: &MetadataRecord,
        summary: &mut RunSummary,
    ) -> MinterResult<ItemOutcome> {
        let resumed = match self.in_flight.take() {
            Some((at, remote_id)) if at == index => Some(remote_id),
            _ => None,
        };
        if let Some(remote_id) = resumed {
            self.emit(MintEvent::Resumed {
                index,
                remote_id: remote_id.clone(),
            });
            let mut job = MintJob::new(index);
            job.submitted(remote_id)?;
            return self.confirm_job(&mut job).await;
        }

        let mut job = loop {
            if self.await_ready(index).await == Flow::Cancelled {
                return Ok(ItemOutcome::Cancelled);
            }

            self.emit(MintEvent::Submitting {
                index,
                uri: record.label().to_string(),
            });
            let mut job = MintJob::new(index);
            match self.wallet.mint_nft(record).await {
                Ok(remote_id) => {
                    self.emit(MintEvent::Submitted {
                        index,
                        remote_id: remote_id.clone(),
                    });
                    self.persist_in_flight(index, &remote_id);
                    job.submitted(remote_id)?;
                    summary.submitted += 1;
                    break job;
                }
                Err(e) => {
                    self.emit(MintEvent::SubmissionFailed {
                        index,
                        error: e.to_string(),
                    });
                    let checkpoint = Checkpoint::SubmissionFailed {
                        index,
                        error: e.to_string(),
                    };
                    match self.prompt.decide(&checkpoint).await {
                        Decision::Proceed => {}
                        Decision::Wait => self.pause().await,
                        Decision::Cancel => return Ok(ItemOutcome::Cancelled),
                    }
                }
            }
        };

        self.confirm_job(&mut job).await
    }

    /// Poll a submitted job until it resolves.
    async fn confirm_job(&mut self, job: &mut MintJob) -> MinterResult<ItemOutcome> {
        job.begin_confirming()?;
        let index = job.index();
        let remote_id = job.remote_id().map(str::to_string).unwrap_or_default();
        let interval = self.settings.poll_interval;

        loop {
            let elapsed = job.elapsed();
            let liveness = self.gate.check_sync().await;
            let observation = if liveness.is_ready() {
                self.probe.observe(&remote_id).await
            } else {
                self.emit(MintEvent::NotReady {
                    index: Some(index),
                    state: liveness,
                });
                PollObservation::Deferred
            };

            match job.observe(observation, interval)? {
                JobState::Minted { remote_id, height } => {
                    self.emit(MintEvent::Minted {
                        index,
                        remote_id: remote_id.clone(),
                        height: *height,
                        elapsed,
                    });
                    return Ok(ItemOutcome::Minted(MintedItem {
                        index,
                        remote_id: remote_id.clone(),
                        height: *height,
                    }));
                }
                JobState::Failed { reason } => {
                    let reason = reason.clone();
                    return Ok(self.failed(index, remote_id, reason, elapsed));
                }
                _ => {}
            }

            if let Some(max) = self.settings.max_poll_ticks {
                if job.ticks() >= max {
                    let reason = format!("confirmation not observed after {} polls", max);
                    let elapsed = job.elapsed();
                    job.give_up(reason.clone())?;
                    return Ok(self.failed(index, remote_id, reason, elapsed));
                }
            }

            self.emit(MintEvent::Polling {
                index,
                remote_id: remote_id.clone(),
                elapsed: job.elapsed(),
                liveness,
            });
            self.clock.sleep(interval).await;
        }
    }

    fn failed(
        &self,
        index: usize,
        remote_id: String,
        reason: String,
        elapsed: Duration,
    ) -> ItemOutcome {
        self.emit(MintEvent::Failed {
            index,
            reason: reason.clone(),
            elapsed,
        });
        ItemOutcome::Failed(FailedItem {
            index,
            remote_id,
            reason,
        })
    }

    /// Block until the wallet is synced or the operator cancels.
    async fn await_ready(&mut self, index: usize) -> Flow {
        loop {
            let state = self.gate.check_sync().await;
            if state.is_ready() {
                self.backoff.reset();
                return Flow::Continue;
            }
            match self.not_ready(Some(index), state).await {
                Decision::Proceed => {}
                Decision::Wait => self.pause().await,
                Decision::Cancel => return Flow::Cancelled,
            }
        }
    }

    async fn not_ready(&mut self, index: Option<usize>, state: LivenessState) -> Decision {
        self.emit(MintEvent::NotReady { index, state });
        self.prompt
            .decide(&Checkpoint::NotReady { index, state })
            .await
    }

    async fn pause(&mut self) {
        let delay = self.backoff.next_delay();
        self.emit(MintEvent::Waiting {
            delay,
            attempt: self.backoff.attempts(),
        });
        self.clock.sleep(delay).await;
    }

    fn persist_cursor(&self, cursor: usize) {
        if let Some(store) = &self.cursor_store {
            if let Err(e) = store.save(cursor) {
                tracing::warn!(
                    cursor,
                    cursor_file = ?store.path(),
                    error = %e,
                    "Failed to persist cursor"
                );
            }
        }
    }

    fn persist_in_flight(&self, cursor: usize, remote_id: &str) {
        if let Some(store) = &self.cursor_store {
            if let Err(e) = store.save_in_flight(cursor, remote_id) {
                tracing::warn!(
                    cursor,
                    remote_id,
                    cursor_file = ?store.path(),
                    error = %e,
                    "Failed to persist in-flight mint"
                );
            }
        }
    }
}
