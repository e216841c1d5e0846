//! Transport collaborator
//!
//! The registry never talks to the network itself. It builds a method, a path
//! and an optional JSON body and hands them to a [`Transport`], which owns
//! addressing, authentication, connection pooling, timeouts and retries.
//!
//! A transport must:
//! - resolve `path` (always starting with the API prefix, e.g. `/v1/...`)
//!   against the service address,
//! - send `body` verbatim as `application/json` when present,
//! - return the raw response body on a 2xx reply,
//! - return [`TransportError::Status`] (see [`TransportError::from_status`])
//!   on any other status.

mod memory;

pub use memory::{InMemoryTransport, RecordedRequest};

use crate::error::TransportError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Request verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    /// The service's `LIST` extension verb
    List,
}

impl Method {
    /// Wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::List => "LIST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for the request/response channel to the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return the response body
    async fn issue(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, TransportError>;

    /// Issue a list request and return the response body
    async fn issue_list(&self, path: &str) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn issue(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        (**self).issue(method, path, body).await
    }

    async fn issue_list(&self, path: &str) -> Result<String, TransportError> {
        (**self).issue_list(path).await
    }
}
