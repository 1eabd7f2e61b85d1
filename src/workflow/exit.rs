//! Process exit status.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | attestation confirmed through the index |
//! | 1 | halted: identity, schema, attestation or settle failure |
//! | 2 | invalid configuration or client construction failure |
//! | 3 | run completed but the query did not succeed |

use thiserror::Error;

use crate::attestation::AttestationError;
use crate::config::ConfigError;
use crate::identity::IdentityError;
use crate::indexing::IndexingError;
use crate::workflow::orchestrator::{WorkflowError, WorkflowReport};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_HALTED: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_QUERY_FAILED: u8 = 3;

/// Failures before the workflow starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Attestation client error: {0}")]
    AttestationClient(#[from] AttestationError),

    #[error("Indexing client error: {0}")]
    IndexingClient(#[from] IndexingError),
}

impl SetupError {
    pub fn exit_status(&self) -> u8 {
        match self {
            SetupError::Identity(_) => EXIT_HALTED,
            SetupError::Config(_)
            | SetupError::AttestationClient(_)
            | SetupError::IndexingClient(_) => EXIT_CONFIG,
        }
    }
}

/// Exit status for a finished (or halted) run.
pub fn exit_status(result: &Result<WorkflowReport, WorkflowError>) -> u8 {
    match result {
        Ok(report) if report.query.is_success() => EXIT_SUCCESS,
        Ok(_) => EXIT_QUERY_FAILED,
        Err(_) => EXIT_HALTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{AttestationReceipt, SchemaId};
    use crate::indexing::{QueryFailure, QueryResult, NO_ATTESTATION_MESSAGE};
    use serde_json::json;
    use uuid::Uuid;

    fn report(query: QueryResult) -> WorkflowReport {
        WorkflowReport {
            run_id: Uuid::new_v4(),
            schema_id: SchemaId::new("onchain_evm_80002_0x1"),
            attestation: AttestationReceipt {
                attestation_id: "onchain_evm_80002_0x2".into(),
                schema_id: SchemaId::new("onchain_evm_80002_0x1"),
                indexing_value: "0xabc".into(),
                tx_hash: None,
            },
            query,
            query_attempts: 1,
        }
    }

    #[test]
    fn test_confirmed_run_exits_zero() {
        let result = Ok(report(QueryResult::Found {
            attestations: vec![json!({ "id": "onchain_evm_80002_0x2" })],
        }));
        assert_eq!(exit_status(&result), EXIT_SUCCESS);
    }

    #[test]
    fn test_unsuccessful_query_exits_three() {
        let empty = Ok(report(QueryResult::Failed {
            reason: QueryFailure::Empty,
            message: NO_ATTESTATION_MESSAGE.into(),
        }));
        assert_eq!(exit_status(&empty), EXIT_QUERY_FAILED);

        let transport = Ok(report(QueryResult::transport("connection refused")));
        assert_eq!(exit_status(&transport), EXIT_QUERY_FAILED);
    }

    #[test]
    fn test_halted_run_exits_one() {
        let schema = Err(WorkflowError::SchemaCreation(AttestationError::Protocol(
            "insufficient funds".into(),
        )));
        assert_eq!(exit_status(&schema), EXIT_HALTED);

        let settle = Err(WorkflowError::SettleTimeout {
            schema_id: SchemaId::new("onchain_evm_80002_0x1"),
            attempts: 6,
        });
        assert_eq!(exit_status(&settle), EXIT_HALTED);
    }

    #[test]
    fn test_setup_failures() {
        let config = SetupError::from(ConfigError::Validation(Vec::new()));
        assert_eq!(config.exit_status(), EXIT_CONFIG);
        assert!(config.to_string().starts_with("Configuration error: "));

        let identity = SetupError::from(IdentityError::MissingKey("ATTEST_PRIVATE_KEY".into()));
        assert_eq!(identity.exit_status(), EXIT_HALTED);
        assert!(identity.to_string().contains("ATTEST_PRIVATE_KEY"));

        let rpc = SetupError::from(AttestationError::Protocol("Invalid RPC URL".into()));
        assert_eq!(rpc.exit_status(), EXIT_CONFIG);

        let indexing = SetupError::from(IndexingError::Endpoint {
            endpoint: "index/attestations".into(),
            reason: "relative URL without a base".into(),
        });
        assert_eq!(indexing.exit_status(), EXIT_CONFIG);
    }
}
