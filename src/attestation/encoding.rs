//! On-chain encodings for schemas, payloads and protocol ids.
//!
//! Schema data is stored as its JSON document. Attestation data is the ABI
//! encoding of the payload values as a parameter list, in schema field order.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Bytes;
use serde_json::Value;

use crate::attestation::types::{
    AttestationError, AttestationPayload, AttestationResult, SchemaDefinition, SchemaId,
};

/// Render the schema document stored on-chain.
pub fn encode_schema(schema: &SchemaDefinition) -> AttestationResult<String> {
    serde_json::to_string(schema).map_err(|e| AttestationError::InvalidSchema(e.to_string()))
}

/// ABI-encode the payload according to the schema's field types.
pub fn encode_payload(
    schema: &SchemaDefinition,
    payload: &AttestationPayload,
) -> AttestationResult<Bytes> {
    payload.check_shape(schema)?;

    let mut values = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let raw = match payload.get(&field.name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => {
                return Err(AttestationError::PayloadMismatch(format!(
                    "missing field '{}'",
                    field.name
                )))
            }
        };
        let value = field
            .field_type
            .sol_type()
            .coerce_str(&raw)
            .map_err(|e| AttestationError::Encoding {
                field: field.name.clone(),
                reason: e.to_string(),
            })?;
        values.push(value);
    }

    Ok(DynSolValue::Tuple(values).abi_encode_params().into())
}

/// Format a numeric on-chain id the way the indexing service names it.
pub fn format_onchain_id(chain_id: u64, id: u64) -> String {
    format!("onchain_evm_{}_0x{:x}", chain_id, id)
}

/// Recover the numeric on-chain id from a schema id.
///
/// Accepts the full `onchain_evm_<chain>_0x<hex>` form or a bare `0x<hex>`.
pub fn parse_onchain_id(schema_id: &SchemaId) -> AttestationResult<u64> {
    let raw = schema_id.as_str();
    let tail = raw.rsplit('_').next().unwrap_or(raw);
    let hex = tail
        .strip_prefix("0x")
        .ok_or_else(|| AttestationError::InvalidSchemaId(raw.to_string()))?;
    u64::from_str_radix(hex, 16).map_err(|_| AttestationError::InvalidSchemaId(raw.to_string()))
}
