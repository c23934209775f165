//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet not ready (or a submission failed):
//!     → operator checkpoint decides proceed / wait / cancel
//!     → on wait: backoff.rs picks the pause before the next liveness check
//!     → Synced check resets the backoff
//! ```
//!
//! # Design Decisions
//! - Submissions are never retried automatically; a retry only happens
//!   after an operator (or the non-interactive policy) chose to wait
//! - Timeouts live in the RPC client, not here
//! - Jittered backoff avoids hammering a wallet that is still syncing

pub mod backoff;

pub use backoff::{calculate_backoff, WaitBackoff};
