//! # Vault AppRole bindings
//!
//! Typed client bindings for the AppRole auth method of a Vault-compatible
//! secret-management service: list the roles on a mount, and create or update
//! a role from a [`RoleOptions`] description.
//!
//! The network side is injected. Implement [`Transport`] on top of whatever
//! HTTP client the application already uses; the registry only builds paths
//! and bodies and interprets the replies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use vault_approle::{RoleOptions, RoleRegistry, TokenType, Transport};
//!
//! async fn provision<T: Transport>(transport: T) -> vault_approle::Result<()> {
//!     let registry = RoleRegistry::new(transport);
//!
//!     let role = RoleOptions::new("ci-runner")
//!         .with_token_policies(["ci", "artifacts-read"])
//!         .with_token_ttl(Duration::from_secs(3600))
//!         .with_token_type(TokenType::Batch);
//!     registry.create_or_update(&role).await?;
//!
//!     for name in registry.list().await? {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod role;
pub mod transport;

pub use config::RegistryConfig;
pub use error::{Error, Result, TransportError};
pub use registry::RoleRegistry;
pub use role::{RoleOptions, TokenType};
pub use transport::{InMemoryTransport, Method, RecordedRequest, Transport};
