//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs and the contract address
//! - Validate value ranges (timeouts > 0, poll bounds)
//! - Check the configured schema is registrable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::attestation::types::SchemaDefinition;
use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("chain.contract_address: invalid address '{0}'")]
    InvalidContractAddress(String),

    #[error("chain.chain_id must be non-zero")]
    ZeroChainId,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("settle.base_delay_ms ({base}) exceeds settle.max_delay_ms ({max})")]
    BackoffOrder { base: u64, max: u64 },

    #[error("identity.private_key_env must not be empty")]
    EmptyKeyVariable,

    #[error("indexing.mode must not be empty")]
    EmptyMode,

    #[error("schema: {0}")]
    Schema(String),
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.chain.rpc_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "chain.rpc_url",
            value: config.chain.rpc_url.clone(),
        });
    }
    if config.chain.chain_id == 0 {
        errors.push(ValidationError::ZeroChainId);
    }
    if config.chain.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidContractAddress(
            config.chain.contract_address.clone(),
        ));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("chain.rpc_timeout_secs"));
    }
    if config.chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("chain.receipt_timeout_secs"));
    }

    if config.identity.private_key_env.trim().is_empty() {
        errors.push(ValidationError::EmptyKeyVariable);
    }

    if url::Url::parse(&config.indexing.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "indexing.base_url",
            value: config.indexing.base_url.clone(),
        });
    }
    if config.indexing.mode.trim().is_empty() {
        errors.push(ValidationError::EmptyMode);
    }
    if config.indexing.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("indexing.request_timeout_secs"));
    }

    if config.settle.max_attempts == 0 {
        errors.push(ValidationError::ZeroValue("settle.max_attempts"));
    }
    if config.settle.base_delay_ms > config.settle.max_delay_ms {
        errors.push(ValidationError::BackoffOrder {
            base: config.settle.base_delay_ms,
            max: config.settle.max_delay_ms,
        });
    }

    let schema = SchemaDefinition::from(&config.schema);
    if let Err(e) = schema.validate() {
        errors.push(ValidationError::Schema(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
