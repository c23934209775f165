//! Mint queue subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<MetadataRecord> + start cursor (config, CLI or cursor.rs)
//!     → mint_queue.rs (ordered records, cursor clamped to bounds)
//!     → orchestrator takes current(), resolves it, advance()
//!     → cursor.rs persists the new cursor after every item
//! ```

pub mod cursor;
pub mod mint_queue;

pub use cursor::{CursorStore, SavedCursor};
pub use mint_queue::MintQueue;
