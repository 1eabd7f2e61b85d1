//! HTTP client for the attestation indexing service.
//!
//! # Responsibilities
//! - Join endpoints onto the configured base URL and issue requests
//! - Treat any non-200 status as an error carrying the raw body
//! - Interpret the query envelope into a [`QueryResult`]
//!
//! `query_attestations` never returns an error: every failure is folded into
//! `QueryResult::Failed` so callers branch on the result, not on `Err`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::attestation::types::SchemaId;
use crate::config::IndexingConfig;
use crate::indexing::types::{IndexEnvelope, IndexingError, QueryResult};

/// Read endpoint for attestation queries, relative to the base URL.
pub const ATTESTATIONS_ENDPOINT: &str = "index/attestations";

/// Method and query parameters for a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Read-side lookup of attestations.
#[async_trait]
pub trait AttestationIndex: Send + Sync {
    async fn query_attestations(
        &self,
        schema_id: &SchemaId,
        attester: &str,
        indexing_value: &str,
    ) -> QueryResult;
}

/// Indexing service client.
#[derive(Debug, Clone)]
pub struct IndexingClient {
    http: Client,
    base_url: Url,
    mode: String,
}

impl IndexingClient {
    /// Create a client from configuration.
    pub fn new(config: &IndexingConfig) -> Result<Self, IndexingError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_client(http, &config.base_url, &config.mode)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str, mode: &str) -> Result<Self, IndexingError> {
        // `Url::join` replaces the last segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| IndexingError::Endpoint {
            endpoint: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            base_url,
            mode: mode.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a request and return the JSON body of a 200 response.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, IndexingError> {
        let url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| IndexingError::Endpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(url = %url, method = %options.method, "Indexing request");

        let response = self
            .http
            .request(options.method, url)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .query(&options.params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Indexing request rejected");
            return Err(IndexingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Query attestations by schema, attester and indexing value.
    ///
    /// `attester` and `indexing_value` are lowercased before sending.
    pub async fn query_attestations(
        &self,
        schema_id: &SchemaId,
        attester: &str,
        indexing_value: &str,
    ) -> QueryResult {
        let options = RequestOptions::get()
            .param("mode", self.mode.as_str())
            .param("schemaId", schema_id.as_str())
            .param("attester", attester.to_lowercase())
            .param("indexingValue", indexing_value.to_lowercase());

        let outcome = match self.request(ATTESTATIONS_ENDPOINT, options).await {
            Ok(body) => serde_json::from_value::<IndexEnvelope>(body)
                .map(QueryResult::from)
                .map_err(IndexingError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, schema_id = %schema_id, "Error querying attestations");
                QueryResult::transport(e)
            }
        }
    }
}

#[async_trait]
impl AttestationIndex for IndexingClient {
    async fn query_attestations(
        &self,
        schema_id: &SchemaId,
        attester: &str,
        indexing_value: &str,
    ) -> QueryResult {
        IndexingClient::query_attestations(self, schema_id, attester, indexing_value).await
    }
}
