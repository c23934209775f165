//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::minting::job::JobError;
use crate::rpc::RpcError;

/// Errors that stop a minting run.
///
/// Everything here is fatal. Recoverable conditions (wallet not ready, a
/// failed submission, an unlocatable transaction) are resolved at operator
/// checkpoints or recorded in the run summary instead.
#[derive(Debug, Error)]
pub enum MinterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("wallet is on network '{actual}', expected '{expected}'")]
    NetworkMismatch { expected: String, actual: String },

    #[error("cursor file {path}: {source}")]
    Cursor {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for minting runs.
pub type MinterResult<T> = Result<T, MinterError>;
