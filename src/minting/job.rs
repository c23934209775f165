//! Mint job state machine.
//!
//! # States
//! - Pending: built from a queue item, nothing sent yet
//! - Submitted: the wallet accepted the mint and returned a remote id
//! - Confirming: waiting for the asset to appear on chain
//! - Minted: the asset is indexed with its inclusion height (terminal)
//! - Failed: the minting transaction cannot be located (terminal)
//!
//! # State Transitions
//! ```text
//! Pending    → Submitted(id):            submission call succeeded
//! Submitted  → Confirming(id, 0):        immediately, no network call
//! Confirming → Confirming(id, t + i):    poll tick, not yet resolved
//! Confirming → Confirming(id, t + i):    wallet not ready, nothing asked
//! Confirming → Minted(id, height):       asset info returned a mint height
//! Confirming → Failed(reason):           transaction cannot be identified
//! ```
//!
//! The machine is pure: it never performs I/O, the orchestrator feeds it
//! observations.

use std::time::Duration;
use thiserror::Error;

/// Lifecycle of one queue item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Submitted { remote_id: String },
    Confirming { remote_id: String, elapsed: Duration },
    Minted { remote_id: String, height: u64 },
    Failed { reason: String },
}

impl JobState {
    pub fn name(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Submitted { .. } => "submitted",
            JobState::Confirming { .. } => "confirming",
            JobState::Minted { .. } => "minted",
            JobState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Minted { .. } | JobState::Failed { .. })
    }
}

/// What one poll tick learned about a confirming job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollObservation {
    /// The asset is indexed at this height.
    Indexed { height: u64 },
    /// Nothing conclusive yet.
    InProgress,
    /// The wallet was not ready, so nothing was asked.
    Deferred,
    /// The minting transaction cannot be located.
    Unlocatable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("invalid transition: cannot {action} a job in state {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

/// Runtime wrapper around one queue item while it is being processed.
#[derive(Debug, Clone)]
pub struct MintJob {
    index: usize,
    state: JobState,
    ticks: u32,
}

impl MintJob {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: JobState::Pending,
            ticks: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Polls that asked the wallet and came back unresolved. Deferred ticks are not counted.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Remote identifier once the wallet accepted the submission.
    pub fn remote_id(&self) -> Option<&str> {
        match &self.state {
            JobState::Submitted { remote_id }
            | JobState::Confirming { remote_id, .. }
            | JobState::Minted { remote_id, .. } => Some(remote_id),
            JobState::Pending | JobState::Failed { .. } => None,
        }
    }

    /// Time spent confirming.
    pub fn elapsed(&self) -> Duration {
        match &self.state {
            JobState::Confirming { elapsed, .. } => *elapsed,
            _ => Duration::ZERO,
        }
    }

    /// Pending → Submitted.
    pub fn submitted(&mut self, remote_id: String) -> Result<(), JobError> {
        match self.state {
            JobState::Pending => {
                self.state = JobState::Submitted { remote_id };
                Ok(())
            }
            _ => Err(self.invalid("submit")),
        }
    }

    /// Submitted → Confirming with zero elapsed time.
    pub fn begin_confirming(&mut self) -> Result<(), JobError> {
        match &mut self.state {
            JobState::Submitted { remote_id } => {
                let remote_id = std::mem::take(remote_id);
                self.state = JobState::Confirming {
                    remote_id,
                    elapsed: Duration::ZERO,
                };
                Ok(())
            }
            _ => Err(self.invalid("start confirming")),
        }
    }

    /// Apply one poll tick. An unresolved tick adds `interval` to the
    /// elapsed time.
    pub fn observe(
        &mut self,
        observation: PollObservation,
        interval: Duration,
    ) -> Result<&JobState, JobError> {
        let (remote_id, elapsed) = match &mut self.state {
            JobState::Confirming { remote_id, elapsed } => (remote_id, elapsed),
            _ => return Err(self.invalid("poll")),
        };

        match observation {
            PollObservation::Indexed { height } => {
                let remote_id = std::mem::take(remote_id);
                self.state = JobState::Minted { remote_id, height };
            }
            PollObservation::InProgress => {
                *elapsed += interval;
                self.ticks += 1;
            }
            PollObservation::Deferred => {
                *elapsed += interval;
            }
            PollObservation::Unlocatable { reason } => {
                self.state = JobState::Failed { reason };
            }
        }
        Ok(&self.state)
    }

    /// Confirming → Failed without a wallet signal, used when the poll
    /// budget runs out.
    pub fn give_up(&mut self, reason: String) -> Result<(), JobError> {
        match self.state {
            JobState::Confirming { .. } => {
                self.state = JobState::Failed { reason };
                Ok(())
            }
            _ => Err(self.invalid("give up on")),
        }
    }

    fn invalid(&self, action: &'static str) -> JobError {
        JobError::InvalidTransition {
            from: self.state.name(),
            action,
        }
    }
}
