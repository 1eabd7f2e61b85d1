//! Indexing query subsystem.
//!
//! # Data Flow
//! ```text
//! (schemaId, attester, indexingValue)
//!     → client.rs (lowercase, GET index/attestations)
//!     → types.rs (envelope → QueryResult)
//!     → QueryResult { success, attestations | message }
//! ```

pub mod client;
pub mod types;

pub use client::{AttestationIndex, IndexingClient, RequestOptions, ATTESTATIONS_ENDPOINT};
pub use types::{
    IndexEnvelope, IndexPage, IndexingError, QueryFailure, QueryResult,
    NO_ATTESTATION_MESSAGE, QUERY_ERROR_PREFIX, QUERY_FAILED_MESSAGE,
};
