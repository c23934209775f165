//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Wallet client → Network check → Metadata file → Queue → Orchestrator
//!
//! Checkpoints (checkpoint.rs):
//!     BeforeQueue / BeforeMinting / NotReady / SubmissionFailed
//!     → operator (console or automatic policy) → proceed / wait / cancel
//!
//! Clock (clock.rs):
//!     Poll intervals and waits → Tokio timer (simulated in tests)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing is read from the metadata file before the
//!   wallet network was shown to the operator
//! - Cancellation happens at checkpoints only, never mid-poll

pub mod checkpoint;
pub mod clock;
pub mod startup;

pub use checkpoint::{AutoPrompt, Checkpoint, ConsolePrompt, Decision, OperatorPrompt, Prompt};
pub use clock::{Clock, TokioClock};
pub use startup::{run_batch, run_batch_with};
