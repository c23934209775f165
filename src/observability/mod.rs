//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator state transitions
//!     → events.rs (MintEvent through the MintObserver port)
//!     → TracingObserver
//!         → logging.rs subscriber (structured log lines)
//!         → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → operator console (fmt layer on stdout)
//!     → Prometheus scrape (optional)
//! ```
//!
//! # Design Decisions
//! - The minting core only talks to the port, so it runs silently in tests
//! - Metrics are cheap (atomic increments) and off the critical path

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{MintEvent, MintObserver, TracingObserver};
