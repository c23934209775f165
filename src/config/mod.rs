//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → MinterConfig (validated, immutable for the whole run)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the shared mint fields are injected
//!   into queue construction instead of living in module state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize_config, load_config, read_config, ConfigError};
pub use schema::{
    BatchConfig, CheckpointConfig, MinterConfig, ObservabilityConfig, WalletRpcConfig,
};
pub use validation::ValidationError;
