//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the workflow.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::attestation::types::{FieldDescriptor, FieldType};

/// Root configuration for the attestation workflow.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain and attestation contract settings.
    pub chain: ChainConfig,

    /// Where the signing key comes from.
    pub identity: IdentityConfig,

    /// Indexing service settings.
    pub indexing: IndexingConfig,

    /// Schema registered at the start of every run.
    pub schema: SchemaConfig,

    /// Attestation payload settings.
    pub attestation: AttestationConfig,

    /// Waits between the write and read steps.
    pub settle: SettleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (80002 for Polygon Amoy).
    pub chain_id: u64,

    /// Address of the Sign Protocol contract on this chain.
    pub contract_address: String,

    /// Deadline for a single RPC call in seconds.
    pub rpc_timeout_secs: u64,

    /// Deadline for a submitted transaction to be mined, in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc-amoy.polygon.technology".to_string(),
            chain_id: 80002,
            contract_address: "0x4e4af2a21ebf62850fD99Eb6253E1eFBb56098cD".to_string(),
            rpc_timeout_secs: 30,
            receipt_timeout_secs: 120,
        }
    }
}

/// Identity configuration.
///
/// Only the *name* of the environment variable lives here, never the key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub private_key_env: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            private_key_env: crate::identity::PRIVATE_KEY_ENV_VAR.to_string(),
        }
    }
}

/// Indexing service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Base URL that endpoints are joined onto.
    pub base_url: String,

    /// Storage mode passed as the `mode` query parameter.
    pub mode: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://testnet-rpc.sign.global/api/".to_string(),
            mode: "onchain".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Schema registered by the workflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            name: "SDK Test".to_string(),
            description: String::new(),
            fields: vec![
                FieldDescriptor::new("contractDetails", FieldType::String),
                FieldDescriptor::new("signer", FieldType::Address),
            ],
        }
    }
}

/// Attestation payload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AttestationConfig {
    /// Value of the `contractDetails` field.
    pub contract_details: String,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            contract_details: "Sample contract details".to_string(),
        }
    }
}

/// Settle configuration between dependent steps.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettleConfig {
    /// Fixed wait before the next step, in milliseconds.
    pub delay_ms: u64,

    /// Poll a confirmation signal after the fixed wait.
    pub poll: bool,

    /// Maximum number of confirmation probes.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            delay_ms: 5_000,
            poll: true,
            max_attempts: 6,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
