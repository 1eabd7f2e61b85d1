//! Schema, payload and receipt types plus error definitions.

use std::collections::HashSet;
use std::fmt;

use alloy::dyn_abi::DynSolType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::SchemaConfig;

/// Primitive type tag of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Address,
    Bool,
    Bytes,
    Bytes32,
    Uint64,
    Uint256,
    Int256,
}

impl FieldType {
    /// The ABI type this tag encodes as.
    pub fn sol_type(self) -> DynSolType {
        match self {
            FieldType::String => DynSolType::String,
            FieldType::Address => DynSolType::Address,
            FieldType::Bool => DynSolType::Bool,
            FieldType::Bytes => DynSolType::Bytes,
            FieldType::Bytes32 => DynSolType::FixedBytes(32),
            FieldType::Uint64 => DynSolType::Uint(64),
            FieldType::Uint256 => DynSolType::Uint(256),
            FieldType::Int256 => DynSolType::Int(256),
        }
    }
}

/// One named, typed field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A named structure describing the shape of future attestations.
///
/// Serializes to the JSON document stored as the schema's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "data")]
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields,
        }
    }

    /// Check the name is set and field names are present and unique.
    pub fn validate(&self) -> AttestationResult<()> {
        if self.name.trim().is_empty() {
            return Err(AttestationError::InvalidSchema("name is empty".to_string()));
        }
        if self.fields.is_empty() {
            return Err(AttestationError::InvalidSchema("no fields defined".to_string()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(AttestationError::InvalidSchema("field with empty name".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(AttestationError::InvalidSchema(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

impl From<&SchemaConfig> for SchemaDefinition {
    fn from(config: &SchemaConfig) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            fields: config.fields.clone(),
        }
    }
}

/// Protocol-global schema identifier assigned on registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub String);

impl SchemaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field values for one attestation, keyed by schema field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttestationPayload(pub serde_json::Map<String, Value>);

impl AttestationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Check the payload supplies exactly the schema's fields.
    pub fn check_shape(&self, schema: &SchemaDefinition) -> AttestationResult<()> {
        for field in &schema.fields {
            if !self.0.contains_key(&field.name) {
                return Err(AttestationError::PayloadMismatch(format!(
                    "missing field '{}'",
                    field.name
                )));
            }
        }
        if let Some(extra) = self
            .0
            .keys()
            .find(|key| !schema.fields.iter().any(|f| &f.name == *key))
        {
            return Err(AttestationError::PayloadMismatch(format!(
                "unknown field '{}'",
                extra
            )));
        }
        Ok(())
    }
}

/// Everything needed to submit one attestation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationRequest {
    pub schema_id: SchemaId,
    pub payload: AttestationPayload,
    /// Secondary lookup key, lowercased.
    pub indexing_value: String,
}

impl AttestationRequest {
    pub fn new(schema_id: SchemaId, payload: AttestationPayload, indexing_value: &str) -> Self {
        Self {
            schema_id,
            payload,
            indexing_value: indexing_value.to_lowercase(),
        }
    }
}

/// Server-assigned record of a submitted attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationReceipt {
    pub attestation_id: String,
    pub schema_id: SchemaId,
    pub indexing_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Errors surfaced by the attestation protocol boundary.
#[derive(Debug, Error)]
pub enum AttestationError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Payload does not match schema: {0}")]
    PayloadMismatch(String),

    #[error("Cannot encode field '{field}': {reason}")]
    Encoding { field: String, reason: String },

    #[error("Invalid schema id '{0}'")]
    InvalidSchemaId(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("{operation} timed out after {millis} ms")]
    Timeout { operation: &'static str, millis: u64 },

    #[error("Receipt for {tx_hash} is missing the {event} event")]
    MissingEvent { tx_hash: String, event: &'static str },
}

/// Result type for attestation operations.
pub type AttestationResult<T> = Result<T, AttestationError>;
