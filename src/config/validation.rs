//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, royalty within 0..=100)
//! - Check that credential paths come in pairs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MinterConfig → Result<(), Vec<ValidationError>>
//! - Runs before any wallet call is made

use thiserror::Error;
use url::Url;

use crate::config::schema::MinterConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("wallet_rpc.endpoint '{0}' is not an http(s) URL")]
    InvalidEndpoint(String),

    #[error("wallet_rpc.cert_path and wallet_rpc.key_path must be set together")]
    IncompleteCredentials,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("mint.royalty_percentage {0} is outside 0..=100")]
    RoyaltyOutOfRange(u16),

    #[error("mint.royalty_address must not be empty")]
    MissingRoyaltyAddress,

    #[error("batch.metadata_file must not be empty")]
    MissingMetadataFile,

    #[error("checkpoint.wait_base_secs ({base}) exceeds checkpoint.wait_max_secs ({max})")]
    WaitBounds { base: u64, max: u64 },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &MinterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rpc = &config.wallet_rpc;
    match Url::parse(&rpc.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidEndpoint(rpc.endpoint.clone())),
    }
    if rpc.cert_path.is_some() != rpc.key_path.is_some() {
        errors.push(ValidationError::IncompleteCredentials);
    }
    if rpc.timeout_secs == 0 {
        errors.push(ValidationError::Zero("wallet_rpc.timeout_secs"));
    }

    let mint = &config.mint;
    if mint.royalty_percentage > 100 {
        errors.push(ValidationError::RoyaltyOutOfRange(mint.royalty_percentage));
    }
    if mint.royalty_address.trim().is_empty() {
        errors.push(ValidationError::MissingRoyaltyAddress);
    }
    if mint.wallet_id == 0 {
        errors.push(ValidationError::Zero("mint.wallet_id"));
    }

    let batch = &config.batch;
    if batch.metadata_file.as_os_str().is_empty() {
        errors.push(ValidationError::MissingMetadataFile);
    }
    if batch.poll_interval_secs == 0 {
        errors.push(ValidationError::Zero("batch.poll_interval_secs"));
    }
    if batch.max_poll_ticks == Some(0) {
        errors.push(ValidationError::Zero("batch.max_poll_ticks"));
    }
    if batch.fee_wallet_id == 0 {
        errors.push(ValidationError::Zero("batch.fee_wallet_id"));
    }

    let checkpoint = &config.checkpoint;
    if checkpoint.wait_base_secs == 0 {
        errors.push(ValidationError::Zero("checkpoint.wait_base_secs"));
    }
    if checkpoint.wait_base_secs > checkpoint.wait_max_secs {
        errors.push(ValidationError::WaitBounds {
            base: checkpoint.wait_base_secs,
            max: checkpoint.wait_max_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
