//! Minting subsystem.
//!
//! # Data Flow
//! ```text
//! MintQueue (cursor)
//!     → orchestrator.rs: liveness gate → submit → poll → advance
//!     → job.rs: Pending → Submitted → Confirming → Minted | Failed
//!     → confirm.rs: one probe per poll tick (asset info, then latest transaction)
//!     → RunSummary
//! ```
//!
//! # Design Decisions
//! - One job in flight: the next item is never submitted before the
//!   current one resolves
//! - Both terminal states advance the cursor; failed items are reported
//!   for follow-up, never retried by the run

pub mod confirm;
pub mod job;
pub mod orchestrator;

pub use confirm::{ConfirmationProbe, UNIDENTIFIED_TRANSACTION};
pub use job::{JobError, JobState, MintJob, PollObservation};
pub use orchestrator::{
    FailedItem, Flow, MintedItem, Orchestrator, OrchestratorSettings, RunOutcome, RunSummary,
};
