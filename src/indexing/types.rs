//! Indexing service wire types and the query outcome.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Prefix of every transport-level query failure message.
pub const QUERY_ERROR_PREFIX: &str = "Error querying attestations: ";
/// Message used when the service reports failure without one.
pub const QUERY_FAILED_MESSAGE: &str = "Attestation query failed.";
/// Message used when the query matched nothing.
pub const NO_ATTESTATION_MESSAGE: &str = "No attestation for this address found.";

/// Errors from the raw request path.
#[derive(Debug, Error)]
pub enum IndexingError {
    /// Network-level failure, propagated unchanged.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-200 status.
    #[error("Indexing service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint could not be joined onto the base URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    /// The response body did not have the expected envelope.
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// `data` section of the envelope.
///
/// Rows stay raw JSON so they are reported exactly as the service sent them.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexPage {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// Top-level JSON envelope of every indexing response.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<IndexPage>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Why a query did not produce attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFailure {
    /// Network, HTTP status or envelope decoding failure.
    Transport,
    /// The service processed the query and reported failure.
    Application,
    /// The query succeeded but matched nothing.
    Empty,
}

/// Outcome of a single attestation query.
///
/// Serializes to `{success: true, attestations}` or `{success: false, message}`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Found {
        attestations: Vec<Value>,
    },
    Failed {
        reason: QueryFailure,
        message: String,
    },
}

impl QueryResult {
    pub fn transport(error: impl std::fmt::Display) -> Self {
        QueryResult::Failed {
            reason: QueryFailure::Transport,
            message: format!("{}{}", QUERY_ERROR_PREFIX, error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Found { .. })
    }

    pub fn attestations(&self) -> &[Value] {
        match self {
            QueryResult::Found { attestations } => attestations,
            QueryResult::Failed { .. } => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            QueryResult::Found { .. } => None,
            QueryResult::Failed { message, .. } => Some(message.as_str()),
        }
    }

    /// `id` of every returned row that carries a string id.
    pub fn attestation_ids(&self) -> Vec<&str> {
        self.attestations()
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_str))
            .collect()
    }

    pub fn failure(&self) -> Option<QueryFailure> {
        match self {
            QueryResult::Found { .. } => None,
            QueryResult::Failed { reason, .. } => Some(*reason),
        }
    }
}

impl From<IndexEnvelope> for QueryResult {
    fn from(envelope: IndexEnvelope) -> Self {
        if !envelope.success {
            return QueryResult::Failed {
                reason: QueryFailure::Application,
                message: envelope
                    .message
                    .unwrap_or_else(|| QUERY_FAILED_MESSAGE.to_string()),
            };
        }

        let Some(page) = envelope.data else {
            return QueryResult::transport("response has no data section");
        };

        let empty = match page.total {
            Some(total) => total == 0,
            None => page.rows.is_empty(),
        };
        if empty {
            return QueryResult::Failed {
                reason: QueryFailure::Empty,
                message: NO_ATTESTATION_MESSAGE.to_string(),
            };
        }

        QueryResult::Found {
            attestations: page.rows,
        }
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryResult", 2)?;
        match self {
            QueryResult::Found { attestations } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("attestations", attestations)?;
            }
            QueryResult::Failed { message, .. } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}
