//! Attestation client subsystem.
//!
//! # Data Flow
//! ```text
//! SchemaDefinition
//!     → encoding.rs (schema JSON document)
//!     → sign_protocol.rs (register, wait for receipt, read SchemaRegistered)
//!     → SchemaId
//!
//! AttestationRequest (schema id + payload + indexing value)
//!     → encoding.rs (ABI-encode payload by schema field types)
//!     → sign_protocol.rs (attest, wait for receipt, read AttestationMade)
//!     → AttestationReceipt
//! ```
//!
//! The orchestrator only sees the [`AttestationProtocol`] trait.

pub mod encoding;
pub mod protocol;
pub mod sign_protocol;
pub mod types;

pub use protocol::AttestationProtocol;
pub use sign_protocol::SignProtocolClient;
pub use types::{
    AttestationError, AttestationPayload, AttestationReceipt, AttestationRequest,
    AttestationResult, FieldDescriptor, FieldType, SchemaDefinition, SchemaId,
};
