//! The attestation protocol boundary.

use async_trait::async_trait;

use crate::attestation::types::{
    AttestationReceipt, AttestationRequest, AttestationResult, SchemaDefinition, SchemaId,
};

/// Typed façade over a remote attestation protocol.
///
/// Implementations do input shaping and error surfacing only; they never
/// retry. The caller decides what a failure means.
#[async_trait]
pub trait AttestationProtocol: Send + Sync {
    /// Register a new schema and return its protocol-assigned id.
    async fn create_schema(&self, schema: &SchemaDefinition) -> AttestationResult<SchemaId>;

    /// Submit one attestation against a previously registered schema.
    async fn create_attestation(
        &self,
        request: &AttestationRequest,
    ) -> AttestationResult<AttestationReceipt>;

    /// Whether the schema is visible to subsequent calls yet.
    async fn schema_exists(&self, schema_id: &SchemaId) -> AttestationResult<bool>;
}
