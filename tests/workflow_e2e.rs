//! End-to-end workflow runs: mock protocol, real indexing client, mock indexer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::json;

use attestation_workflow::attestation::{
    AttestationError, AttestationProtocol, AttestationReceipt, AttestationRequest,
    AttestationResult, FieldDescriptor, FieldType, SchemaDefinition, SchemaId,
};
use attestation_workflow::config::IndexingConfig;
use attestation_workflow::identity::Identity;
use attestation_workflow::indexing::IndexingClient;
use attestation_workflow::workflow::{SettlePolicy, Workflow, WorkflowError, WorkflowPlan};

mod common;

#[derive(Default)]
struct RecordingProtocol {
    fail_schema: bool,
    schemas: std::sync::Mutex<Vec<SchemaDefinition>>,
    attestations: std::sync::Mutex<Vec<AttestationRequest>>,
    exists_calls: AtomicUsize,
}

#[async_trait]
impl AttestationProtocol for RecordingProtocol {
    async fn create_schema(&self, schema: &SchemaDefinition) -> AttestationResult<SchemaId> {
        self.schemas.lock().unwrap().push(schema.clone());
        if self.fail_schema {
            return Err(AttestationError::Protocol("nonce too low".into()));
        }
        Ok(SchemaId::new("onchain_evm_1"))
    }

    async fn create_attestation(
        &self,
        request: &AttestationRequest,
    ) -> AttestationResult<AttestationReceipt> {
        self.attestations.lock().unwrap().push(request.clone());
        Ok(AttestationReceipt {
            attestation_id: "onchain_evm_1_0x1".into(),
            schema_id: request.schema_id.clone(),
            indexing_value: request.indexing_value.clone(),
            tx_hash: Some("0xabc".into()),
        })
    }

    async fn schema_exists(&self, _schema_id: &SchemaId) -> AttestationResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

fn sdk_test_schema() -> SchemaDefinition {
    SchemaDefinition::new(
        "SDK Test",
        vec![
            FieldDescriptor::new("contractDetails", FieldType::String),
            FieldDescriptor::new("signer", FieldType::Address),
        ],
    )
}

fn index_for(indexer: &common::MockIndexer) -> IndexingClient {
    IndexingClient::new(&IndexingConfig {
        base_url: indexer.base_url(),
        request_timeout_secs: 5,
        ..IndexingConfig::default()
    })
    .unwrap()
}

fn polling() -> SettlePolicy {
    SettlePolicy {
        delay: Duration::from_millis(10),
        poll: true,
        max_attempts: 4,
        base_delay_ms: 5,
        max_delay_ms: 20,
    }
}

#[tokio::test]
async fn test_sdk_test_scenario() {
    let identity = Identity::from_signer(PrivateKeySigner::random());
    let address = identity.address().to_string();
    let rows = json!([{
        "id": "onchain_evm_1_0x1",
        "attester": address.to_lowercase(),
        "indexingValue": address.to_lowercase(),
        "data": { "contractDetails": "Sample contract details", "signer": address }
    }]);
    let indexer = common::start_mock_indexer(
        200,
        json!({ "success": true, "data": { "total": 1, "rows": rows.clone() } }),
    )
    .await;

    let workflow = Workflow::new(
        RecordingProtocol::default(),
        index_for(&indexer),
        SettlePolicy::fixed(Duration::from_millis(10)),
    );
    let plan = WorkflowPlan::notary(sdk_test_schema(), "Sample contract details", identity.address());

    let report = workflow.run(&plan).await.unwrap();

    assert_eq!(report.schema_id, SchemaId::new("onchain_evm_1"));
    assert_eq!(
        serde_json::to_value(&report.query).unwrap(),
        json!({ "success": true, "attestations": rows })
    );

    let schemas = workflow.protocol().schemas.lock().unwrap().clone();
    assert_eq!(schemas, vec![sdk_test_schema()]);

    let attestations = workflow.protocol().attestations.lock().unwrap().clone();
    assert_eq!(attestations.len(), 1);
    assert_eq!(attestations[0].schema_id, SchemaId::new("onchain_evm_1"));
    assert_eq!(
        attestations[0].payload.get("contractDetails").unwrap(),
        &json!("Sample contract details")
    );
    assert_eq!(attestations[0].payload.get("signer").unwrap(), &json!(address));
    assert_eq!(attestations[0].indexing_value, address.to_lowercase());

    let requests = indexer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["schemaId"], "onchain_evm_1");
    assert_eq!(requests[0]["attester"], address.to_lowercase());
    assert_eq!(requests[0]["indexingValue"], address.to_lowercase());
}

#[tokio::test]
async fn test_polls_until_indexed() {
    let identity = Identity::from_signer(PrivateKeySigner::random());
    let empty = json!({ "success": true, "data": { "total": 0, "rows": [] } });
    let found = json!({ "success": true, "data": { "total": 1, "rows": [{ "id": "onchain_evm_1_0x1" }] } });
    let indexer = common::start_scripted_indexer(vec![
        (200, empty.clone()),
        (500, json!({ "error": "lagging" })),
        (200, found),
    ])
    .await;

    let workflow = Workflow::new(RecordingProtocol::default(), index_for(&indexer), polling());
    let plan = WorkflowPlan::notary(sdk_test_schema(), "Sample contract details", identity.address());

    let report = workflow.run(&plan).await.unwrap();

    assert!(report.query.is_success());
    assert_eq!(report.query_attempts, 3);
    assert_eq!(indexer.requests().len(), 3);
    assert_eq!(workflow.protocol().exists_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_schema_failure_never_reaches_indexer() {
    let identity = Identity::from_signer(PrivateKeySigner::random());
    let indexer = common::start_mock_indexer(200, json!({ "success": true })).await;
    let protocol = RecordingProtocol {
        fail_schema: true,
        ..RecordingProtocol::default()
    };

    let workflow = Workflow::new(protocol, index_for(&indexer), polling());
    let plan = WorkflowPlan::notary(sdk_test_schema(), "Sample contract details", identity.address());

    let err = workflow.run(&plan).await.unwrap_err();

    assert!(matches!(err, WorkflowError::SchemaCreation(_)));
    assert!(err.to_string().contains("nonce too low"));
    assert_eq!(workflow.protocol().schemas.lock().unwrap().len(), 1);
    assert!(workflow.protocol().attestations.lock().unwrap().is_empty());
    assert_eq!(workflow.protocol().exists_calls.load(Ordering::SeqCst), 0);
    assert!(indexer.requests().is_empty());
}
