//! Indexing client against a mock indexing service.

use serde_json::json;

use attestation_workflow::attestation::SchemaId;
use attestation_workflow::config::IndexingConfig;
use attestation_workflow::indexing::{
    IndexingClient, IndexingError, QueryFailure, RequestOptions, ATTESTATIONS_ENDPOINT,
    NO_ATTESTATION_MESSAGE, QUERY_ERROR_PREFIX, QUERY_FAILED_MESSAGE,
};

mod common;

const ATTESTER: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn client_for(base_url: String) -> IndexingClient {
    IndexingClient::new(&IndexingConfig {
        base_url,
        request_timeout_secs: 5,
        ..IndexingConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_zero_total_reports_no_attestation() {
    let indexer = common::start_mock_indexer(
        200,
        json!({ "success": true, "data": { "total": 0, "rows": [] } }),
    )
    .await;
    let client = client_for(indexer.base_url());

    let result = client
        .query_attestations(&SchemaId::new("abc"), ATTESTER, ATTESTER)
        .await;

    assert!(!result.is_success());
    assert_eq!(result.failure(), Some(QueryFailure::Empty));
    assert_eq!(result.message(), Some(NO_ATTESTATION_MESSAGE));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": false, "message": "No attestation for this address found." })
    );
}

#[tokio::test]
async fn test_rows_are_returned_unmodified() {
    let rows = json!([{
        "id": "onchain_evm_80002_0x3f",
        "attestationId": "0x3f",
        "fullSchemaId": "onchain_evm_80002_0x1a",
        "attester": ATTESTER.to_lowercase(),
        "indexingValue": ATTESTER.to_lowercase(),
        "revoked": false,
        "attestTimestamp": "1718000000000"
    }]);
    let indexer = common::start_mock_indexer(
        200,
        json!({ "success": true, "data": { "total": 1, "rows": rows.clone() } }),
    )
    .await;
    let client = client_for(indexer.base_url());

    let result = client
        .query_attestations(&SchemaId::new("onchain_evm_80002_0x1a"), ATTESTER, ATTESTER)
        .await;

    assert!(result.is_success());
    assert_eq!(result.attestations().len(), 1);
    assert_eq!(
        serde_json::to_value(result.attestations()).unwrap(),
        rows
    );
}

#[tokio::test]
async fn test_query_parameters_are_lowercased() {
    let indexer = common::start_mock_indexer(
        200,
        json!({ "success": true, "data": { "total": 0, "rows": [] } }),
    )
    .await;
    let client = client_for(indexer.base_url());

    let mixed = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";
    client
        .query_attestations(&SchemaId::new("onchain_evm_80002_0x1A"), mixed, "MiXeD-Value")
        .await;

    let requests = indexer.requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0];
    assert_eq!(params["mode"], "onchain");
    assert_eq!(params["schemaId"], "onchain_evm_80002_0x1A");
    assert_eq!(params["attester"], mixed.to_lowercase());
    assert_eq!(params["indexingValue"], "mixed-value");
}

#[tokio::test]
async fn test_application_failure_message() {
    let indexer =
        common::start_mock_indexer(200, json!({ "success": false, "message": "bad schema" })).await;
    let client = client_for(indexer.base_url());

    let result = client
        .query_attestations(&SchemaId::new("abc"), ATTESTER, ATTESTER)
        .await;
    assert_eq!(result.failure(), Some(QueryFailure::Application));
    assert_eq!(result.message(), Some("bad schema"));

    let indexer = common::start_mock_indexer(200, json!({ "success": false })).await;
    let client = client_for(indexer.base_url());
    let result = client
        .query_attestations(&SchemaId::new("abc"), ATTESTER, ATTESTER)
        .await;
    assert_eq!(result.message(), Some(QUERY_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_non_200_embeds_raw_response() {
    let indexer =
        common::start_mock_indexer(503, json!({ "error": "indexer maintenance" })).await;
    let client = client_for(indexer.base_url());

    let err = client
        .request(ATTESTATIONS_ENDPOINT, RequestOptions::get().param("mode", "onchain"))
        .await
        .unwrap_err();
    match &err {
        IndexingError::Status { status, body } => {
            assert_eq!(*status, 503);
            assert!(body.contains("indexer maintenance"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let result = client
        .query_attestations(&SchemaId::new("abc"), ATTESTER, ATTESTER)
        .await;
    assert_eq!(result.failure(), Some(QueryFailure::Transport));
    let message = result.message().unwrap();
    assert!(message.starts_with(QUERY_ERROR_PREFIX));
    assert!(message.contains("503"));
    assert!(message.contains("indexer maintenance"));
}

#[tokio::test]
async fn test_network_failure_preserves_error_text() {
    let addr = common::closed_port().await;
    let client = client_for(format!("http://{}/api/", addr));

    let result = client
        .query_attestations(&SchemaId::new("abc"), ATTESTER, ATTESTER)
        .await;

    assert_eq!(result.failure(), Some(QueryFailure::Transport));
    let message = result.message().unwrap();
    assert!(message.starts_with(QUERY_ERROR_PREFIX));
    assert!(message.len() > QUERY_ERROR_PREFIX.len());
    assert!(message.contains(&addr.to_string()));
}

#[tokio::test]
async fn test_request_returns_raw_body() {
    let body = json!({ "success": true, "data": { "total": 3, "rows": [] }, "extra": 1 });
    let indexer = common::start_mock_indexer(200, body.clone()).await;
    let client = client_for(indexer.base_url());

    let value = client
        .request("/index/attestations", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value, body);
}
