//! Shared utilities for integration testing.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

struct IndexerState {
    /// Canned (status, body) pairs; the last one repeats.
    responses: Mutex<VecDeque<(u16, Value)>>,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

/// Handle to a running mock indexing service.
#[derive(Clone)]
pub struct MockIndexer {
    pub addr: SocketAddr,
    state: Arc<IndexerState>,
}

#[allow(dead_code)]
impl MockIndexer {
    /// Base URL to configure the indexing client with.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Start a mock indexer that always answers with the same response.
#[allow(dead_code)]
pub async fn start_mock_indexer(status: u16, body: Value) -> MockIndexer {
    start_scripted_indexer(vec![(status, body)]).await
}

/// Start a mock indexer that plays back responses in order.
#[allow(dead_code)]
pub async fn start_scripted_indexer(responses: Vec<(u16, Value)>) -> MockIndexer {
    let state = Arc::new(IndexerState {
        responses: Mutex::new(responses.into()),
        requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/index/attestations", get(attestations))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockIndexer { addr, state }
}

async fn attestations(
    State(state): State<Arc<IndexerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(params);

    let mut responses = state.responses.lock().unwrap();
    let (status, body) = if responses.len() > 1 {
        responses.pop_front().unwrap()
    } else {
        responses.front().cloned().unwrap_or((404, Value::Null))
    };
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(body),
    )
}

/// A loopback address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
