//! Wallet health subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator, before each submission and each poll tick
//!     → liveness.rs asks get_sync_status
//!     → LivenessState (Synced / Syncing / NotSynced / Unreachable)
//! ```
//!
//! # Design Decisions
//! - No background probing: the state is refreshed on demand only
//! - A failed probe is a state (Unreachable), not an error

pub mod liveness;

pub use liveness::{LivenessGate, LivenessState};
