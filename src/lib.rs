//! Bulk NFT minting against a Chia wallet RPC service.
//!
//! # Architecture Overview
//!
//! ```text
//!   metadata file ──▶ metadata ──▶ queue (cursor) ──▶ minting::Orchestrator
//!                                                         │
//!                           ┌─────────────────────────────┼───────────────────┐
//!                           ▼                             ▼                   ▼
//!                     health (liveness)           minting (job, probe)   lifecycle
//!                           │                             │              (checkpoints,
//!                           └──────────────┬──────────────┘               clock)
//!                                          ▼
//!                                 rpc (WalletApi → RpcClient) ──▶ wallet RPC (HTTPS + client cert)
//!
//!   Cross-cutting: config, observability (events, logging, metrics), resilience (backoff), error
//! ```
//!
//! One job is in flight at a time. Every state transition is reported
//! through [`observability::MintObserver`].

// Input and transport
pub mod config;
pub mod metadata;
pub mod rpc;

// Minting core
pub mod health;
pub mod minting;
pub mod queue;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::MinterConfig;
pub use error::{MinterError, MinterResult};
pub use lifecycle::{run_batch, run_batch_with};
pub use minting::{RunOutcome, RunSummary};
