//! Registry configuration

use crate::error::{Error, Result};
use std::env;

/// Environment variable overriding the AppRole mount path
pub const MOUNT_ENV: &str = "VAULT_APPROLE_MOUNT";

/// Environment variable overriding the API version prefix
pub const API_PREFIX_ENV: &str = "VAULT_API_PREFIX";

/// Where the AppRole auth method lives on the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// API version prefix (e.g. "/v1")
    pub api_prefix: String,

    /// Mount path of the AppRole auth method, without slashes (e.g. "approle")
    pub mount: String,
}

impl RegistryConfig {
    /// Create a configuration for the default mount (`/v1/auth/approle`)
    pub fn new() -> Self {
        Self {
            api_prefix: "/v1".to_string(),
            mount: "approle".to_string(),
        }
    }

    /// Load the defaults with environment variable overrides
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(val) = env::var(MOUNT_ENV) {
            if !val.trim().is_empty() {
                config.mount = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var(API_PREFIX_ENV) {
            if !val.trim().is_empty() {
                config.api_prefix = val.trim().to_string();
            }
        }

        config
    }

    /// Set the AppRole mount path
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Set the API version prefix
    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    /// Check that the derived paths are well formed
    pub fn validate(&self) -> Result<()> {
        if self.mount.is_empty() {
            return Err(Error::InvalidInput("mount path must not be empty".into()));
        }
        if self.mount.starts_with('/') || self.mount.ends_with('/') {
            return Err(Error::InvalidInput(format!(
                "mount path {:?} must not start or end with '/'",
                self.mount
            )));
        }
        if !self.api_prefix.starts_with('/') {
            return Err(Error::InvalidInput(format!(
                "api prefix {:?} must start with '/'",
                self.api_prefix
            )));
        }
        Ok(())
    }

    /// Path of the role collection, e.g. `/v1/auth/approle/role`
    pub fn roles_path(&self) -> String {
        format!(
            "{}/auth/{}/role",
            self.api_prefix.trim_end_matches('/'),
            self.mount
        )
    }

    /// Path of a single role, e.g. `/v1/auth/approle/role/ci-runner`
    pub fn role_path(&self, name: &str) -> String {
        format!("{}/{}", self.roles_path(), name)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
