//! Sequential schema → attestation → query workflow.
//!
//! # Stages
//! ```text
//! Start → SchemaCreated → AttestationCreated → Queried → Done
//! ```
//!
//! A failed write halts the run with a distinguishable [`WorkflowError`]; no
//! later step executes. The query outcome is always reported, success or not.

use std::fmt;

use alloy::primitives::Address;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::attestation::{
    AttestationError, AttestationPayload, AttestationProtocol, AttestationReceipt,
    AttestationRequest, SchemaDefinition, SchemaId,
};
use crate::indexing::{AttestationIndex, QueryResult};
use crate::workflow::settle::SettlePolicy;

/// Progress of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    SchemaCreated,
    AttestationCreated,
    Queried,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::SchemaCreated => "schema_created",
            Stage::AttestationCreated => "attestation_created",
            Stage::Queried => "queried",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowPlan {
    pub schema: SchemaDefinition,
    pub payload: AttestationPayload,
    /// Address the attestation is expected under.
    pub attester: String,
    /// Secondary lookup key; lowercased before use.
    pub indexing_value: String,
}

impl WorkflowPlan {
    /// A notary attestation: `contractDetails` signed by `signer`, indexed
    /// by the signer's address.
    pub fn notary(schema: SchemaDefinition, contract_details: &str, signer: Address) -> Self {
        let signer = signer.to_string();
        Self {
            schema,
            payload: AttestationPayload::new()
                .with("contractDetails", contract_details)
                .with("signer", signer.clone()),
            attester: signer.clone(),
            indexing_value: signer.to_lowercase(),
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub run_id: Uuid,
    pub schema_id: SchemaId,
    pub attestation: AttestationReceipt,
    pub query: QueryResult,
    /// Number of queries made before the result was reported.
    pub query_attempts: u32,
}

/// Why a run halted before querying.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid workflow plan: {0}")]
    InvalidPlan(#[source] AttestationError),

    #[error("Error creating schema: {0}")]
    SchemaCreation(#[source] AttestationError),

    #[error("Error creating attestation under schema {schema_id}: {source}")]
    AttestationCreation {
        schema_id: SchemaId,
        #[source]
        source: AttestationError,
    },

    #[error("Schema {schema_id} not visible after {attempts} attempts")]
    SettleTimeout { schema_id: SchemaId, attempts: u32 },
}

impl WorkflowError {
    /// The stage the run had reached when it halted.
    pub fn stage(&self) -> Stage {
        match self {
            WorkflowError::InvalidPlan(_) | WorkflowError::SchemaCreation(_) => Stage::Start,
            WorkflowError::AttestationCreation { .. } | WorkflowError::SettleTimeout { .. } => {
                Stage::SchemaCreated
            }
        }
    }
}

/// Orchestrates one run against an attestation protocol and an index.
pub struct Workflow<P, I> {
    protocol: P,
    index: I,
    settle: SettlePolicy,
}

impl<P, I> Workflow<P, I>
where
    P: AttestationProtocol,
    I: AttestationIndex,
{
    pub fn new(protocol: P, index: I, settle: SettlePolicy) -> Self {
        Self {
            protocol,
            index,
            settle,
        }
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Run every stage in order. Only one network call is in flight at a time.
    pub async fn run(&self, plan: &WorkflowPlan) -> Result<WorkflowReport, WorkflowError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", %run_id);
        self.execute(run_id, plan).instrument(span).await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        plan: &WorkflowPlan,
    ) -> Result<WorkflowReport, WorkflowError> {
        plan.schema.validate().map_err(WorkflowError::InvalidPlan)?;
        plan.payload
            .check_shape(&plan.schema)
            .map_err(WorkflowError::InvalidPlan)?;

        let mut stage = Stage::Start;

        let schema_id = match self.protocol.create_schema(&plan.schema).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Error creating schema");
                return Err(WorkflowError::SchemaCreation(e));
            }
        };
        advance(&mut stage, Stage::SchemaCreated);
        tracing::info!(schema_id = %schema_id, schema = %plan.schema.name, "Schema created");

        self.settle.wait("schema").await;
        if self.settle.poll {
            let settled = self
                .settle
                .poll_until(
                    "schema",
                    || self.protocol.schema_exists(&schema_id),
                    |probe| matches!(probe, Ok(true)),
                )
                .await;
            if !settled.confirmed {
                if let Err(e) = &settled.value {
                    tracing::warn!(error = %e, "Last schema probe failed");
                }
                return Err(WorkflowError::SettleTimeout {
                    schema_id,
                    attempts: settled.attempts,
                });
            }
        }

        let request =
            AttestationRequest::new(schema_id.clone(), plan.payload.clone(), &plan.indexing_value);
        let attestation = match self.protocol.create_attestation(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::error!(error = %e, schema_id = %schema_id, "Error creating attestation");
                return Err(WorkflowError::AttestationCreation {
                    schema_id,
                    source: e,
                });
            }
        };
        advance(&mut stage, Stage::AttestationCreated);
        tracing::info!(
            attestation_id = %attestation.attestation_id,
            indexing_value = %attestation.indexing_value,
            "Attestation created"
        );

        self.settle.wait("attestation").await;
        let settled = self
            .settle
            .poll_until(
                "attestation",
                || {
                    self.index
                        .query_attestations(&schema_id, &plan.attester, &request.indexing_value)
                },
                QueryResult::is_success,
            )
            .await;
        advance(&mut stage, Stage::Queried);

        match &settled.value {
            QueryResult::Found { attestations } => tracing::info!(
                count = attestations.len(),
                attempts = settled.attempts,
                "Attestation visible in index"
            ),
            QueryResult::Failed { message, reason } => tracing::warn!(
                reason = ?reason,
                message = %message,
                attempts = settled.attempts,
                "Attestation query did not succeed"
            ),
        }

        advance(&mut stage, Stage::Done);
        Ok(WorkflowReport {
            run_id,
            schema_id,
            attestation,
            query: settled.value,
            query_attempts: settled.attempts,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = %stage, to = %next, "Stage transition");
    *stage = next;
}
