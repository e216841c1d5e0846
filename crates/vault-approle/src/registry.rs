//! AppRole role registry
//!
//! Stateless operations against the AppRole role endpoints. Each call is a
//! single request through the injected [`Transport`]; nothing is retried and
//! nothing is cached between calls.
//!
//! Supported:
//! - list roles (`LIST /v1/auth/approle/role`)
//! - create or update a role (`POST /v1/auth/approle/role/{name}`)
//!
//! Not yet covered: read and delete role, read and update role ID, secret ID
//! generation, listing, lookup and destruction (including accessors and
//! custom secret IDs), login, and tidy.

use crate::config::RegistryConfig;
use crate::error::{Error, Result, TransportError};
use crate::role::RoleOptions;
use crate::transport::{Method, Transport};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Body of a list response: `{"data": {"keys": [...]}}`
#[derive(Debug, Deserialize)]
struct ListResponse {
    data: ListData,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    keys: Vec<String>,
}

/// Registry of AppRole roles
///
/// ```rust
/// use std::time::Duration;
/// use vault_approle::{InMemoryTransport, RoleOptions, RoleRegistry};
///
/// # async fn example() -> vault_approle::Result<()> {
/// let registry = RoleRegistry::new(InMemoryTransport::new());
///
/// let role = RoleOptions::new("ci-runner")
///     .with_token_ttl(Duration::from_secs(3600))
///     .with_token_policies(["ci"]);
/// registry.create_or_update(&role).await?;
///
/// let names = registry.list().await?;
/// # let _ = names;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RoleRegistry<T: Transport> {
    transport: T,
    config: RegistryConfig,
}

impl<T: Transport> RoleRegistry<T> {
    /// Create a registry for the default AppRole mount
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: RegistryConfig::default(),
        }
    }

    /// Create a registry with a custom mount configuration
    pub fn with_config(transport: T, config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// Get the mount configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// List role names, sorted ascending.
    ///
    /// A mount with no roles answers 404, which surfaces as
    /// [`Error::ListFailed`]; see [`Error::is_not_found`].
    pub async fn list(&self) -> Result<Vec<String>> {
        let path = self.config.roles_path();

        let mut keys = match self.fetch_keys(&path).await {
            Ok(keys) => keys,
            Err(source) => {
                warn!(path = %path, error = %source, "Failed to list roles");
                return Err(Error::ListFailed { path, source });
            }
        };

        keys.sort_unstable();
        info!(path = %path, count = keys.len(), "Listed roles");
        Ok(keys)
    }

    async fn fetch_keys(&self, path: &str) -> std::result::Result<Vec<String>, TransportError> {
        let body = self.transport.issue_list(path).await?;
        let response: ListResponse = serde_json::from_str(&body)?;
        Ok(response.data.keys)
    }

    /// Create a role, or replace it if it already exists.
    ///
    /// The options are validated locally first; an invalid name or CIDR fails
    /// with [`Error::InvalidInput`] before any request is issued.
    pub async fn create_or_update(&self, options: &RoleOptions) -> Result<()> {
        options.validate()?;

        let body = options.to_json()?;
        let path = self.config.role_path(&options.name);

        debug!(path = %path, body = %body, "role-create request");

        if let Err(source) = self.transport.issue(Method::Post, &path, Some(body)).await {
            warn!(path = %path, error = %source, "Failed to write role");
            return Err(Error::WriteFailed { path, source });
        }

        info!(role = %options.name, path = %path, "Role written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::TokenType;
    use crate::transport::InMemoryTransport;
    use serde_json::{json, Value};
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_sorts_keys() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Ok(r#"{"data":{"keys":["z","a","m"]}}"#.to_string()))
            .await;
        let registry = RoleRegistry::new(transport.clone());

        let names = registry.list().await.unwrap();

        assert_eq!(names, vec!["a", "m", "z"]);
        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::List);
        assert_eq!(requests[0].path, "/v1/auth/approle/role");
    }

    #[tokio::test]
    async fn test_list_sorts_by_code_point() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Ok(r#"{"data":{"keys":["b","B","é","a"]}}"#.to_string()))
            .await;

        let names = RoleRegistry::new(transport).list().await.unwrap();

        assert_eq!(names, vec!["B", "a", "b", "é"]);
    }

    #[tokio::test]
    async fn test_list_ignores_extra_fields() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Ok(json!({
                "request_id": "abc",
                "lease_id": "",
                "renewable": false,
                "data": { "keys": ["web"] },
                "warnings": null
            })
            .to_string()))
            .await;

        let names = RoleRegistry::new(transport).list().await.unwrap();

        assert_eq!(names, vec!["web"]);
    }

    #[tokio::test]
    async fn test_list_malformed_body() {
        let transport = InMemoryTransport::new();
        transport.push_response(Ok("not json".to_string())).await;

        let err = RoleRegistry::new(transport).list().await.unwrap_err();

        match err {
            Error::ListFailed { path, source } => {
                assert_eq!(path, "/v1/auth/approle/role");
                assert!(matches!(source, TransportError::Decode(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_missing_data_is_malformed() {
        let transport = InMemoryTransport::new();

        // default reply is "{}"
        let err = RoleRegistry::new(transport).list().await.unwrap_err();

        assert!(matches!(err, Error::ListFailed { .. }));
    }

    #[tokio::test]
    async fn test_list_not_found() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Err(TransportError::from_status(404, r#"{"errors":[]}"#)))
            .await;

        let err = RoleRegistry::new(transport).list().await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.path(), Some("/v1/auth/approle/role"));
    }

    #[tokio::test]
    async fn test_list_custom_mount() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Ok(r#"{"data":{"keys":[]}}"#.to_string()))
            .await;
        let config = RegistryConfig::new().with_mount("ci-approle");
        let registry = RoleRegistry::with_config(transport.clone(), config).unwrap();

        assert!(registry.list().await.unwrap().is_empty());
        assert_eq!(
            transport.requests().await[0].path,
            "/v1/auth/ci-approle/role"
        );
    }

    #[test]
    fn test_with_config_rejects_invalid_mount() {
        let config = RegistryConfig::new().with_mount("");
        let result = RoleRegistry::with_config(InMemoryTransport::new(), config);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_posts_body_to_role_path() {
        let transport = InMemoryTransport::new();
        let registry = RoleRegistry::new(transport.clone());
        let options = RoleOptions::new("ci-runner")
            .with_token_ttl(Duration::from_secs(3600))
            .with_token_type(TokenType::Service);

        registry.create_or_update(&options).await.unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/v1/auth/approle/role/ci-runner");

        let sent = requests[0].body.as_deref().unwrap();
        let body: Value = serde_json::from_str(sent).unwrap();
        assert_eq!(
            body,
            json!({ "role_name": "ci-runner", "token_ttl": 3600, "token_type": "service" })
        );
    }

    #[tokio::test]
    async fn test_create_twice_is_upsert() {
        let transport = InMemoryTransport::new();
        let registry = RoleRegistry::new(transport.clone());

        registry
            .create_or_update(&RoleOptions::new("web"))
            .await
            .unwrap();
        registry
            .create_or_update(&RoleOptions::new("web").with_token_num_uses(3))
            .await
            .unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.path == "/v1/auth/approle/role/web"));
    }

    #[tokio::test]
    async fn test_create_empty_name_issues_no_request() {
        let transport = InMemoryTransport::new();
        let registry = RoleRegistry::new(transport.clone());

        let err = registry
            .create_or_update(&RoleOptions::new(""))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_connection_failure_is_write_failed() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Err(TransportError::Connection(
                "connection refused".to_string(),
            )))
            .await;
        let registry = RoleRegistry::new(transport);

        let err = registry
            .create_or_update(&RoleOptions::new("ci-runner"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        match err {
            Error::WriteFailed { path, source } => {
                assert_eq!(path, "/v1/auth/approle/role/ci-runner");
                assert!(matches!(source, TransportError::Connection(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_path_breaking_name_issues_no_request() {
        let transport = InMemoryTransport::new();
        let registry = RoleRegistry::new(transport.clone());

        let err = registry
            .create_or_update(&RoleOptions::new("../sys/policy"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_encoding_failure_issues_no_request() {
        let transport = InMemoryTransport::new();
        let registry = RoleRegistry::new(transport.clone());
        let options = RoleOptions::new("r").with_secret_id_ttl(Duration::from_millis(250));

        let err = registry.create_or_update(&options).await.unwrap_err();

        assert!(matches!(err, Error::EncodingFailed(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_transport_failure_is_write_failed() {
        let transport = InMemoryTransport::new();
        transport
            .push_response(Err(TransportError::from_status(
                400,
                r#"{"errors":["token_max_ttl cannot be less than token_ttl"]}"#,
            )))
            .await;
        let registry = RoleRegistry::new(transport.clone());

        let err = registry
            .create_or_update(&RoleOptions::new("ci-runner"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("/v1/auth/approle/role/ci-runner"));
        match err {
            Error::WriteFailed { path, source } => {
                assert_eq!(path, "/v1/auth/approle/role/ci-runner");
                assert!(matches!(source, TransportError::Status { status: 400, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().await.len(), 1);
    }
}
