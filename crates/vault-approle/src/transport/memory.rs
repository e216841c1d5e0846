//! In-memory transport for testing

use super::{Method, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A request captured by [`InMemoryTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    requests: Vec<RecordedRequest>,
    responses: VecDeque<Result<String, TransportError>>,
}

/// Scripted transport that records every request.
///
/// Replies are served in the order they were pushed; once the queue is
/// drained every request is answered with `{}`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    state: Arc<Mutex<State>>,
}

impl InMemoryTransport {
    /// Create a new in-memory transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next request
    pub async fn push_response(&self, response: Result<String, TransportError>) {
        self.state.lock().await.responses.push_back(response);
    }

    /// Get all recorded requests
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Clear recorded requests and pending replies
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.requests.clear();
        state.responses.clear();
    }

    async fn record(&self, request: RecordedRequest) -> Result<String, TransportError> {
        let mut state = self.state.lock().await;
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn issue(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        self.record(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        })
        .await
    }

    async fn issue_list(&self, path: &str) -> Result<String, TransportError> {
        self.record(RecordedRequest {
            method: Method::List,
            path: path.to_string(),
            body: None,
        })
        .await
    }
}
