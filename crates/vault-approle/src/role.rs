//! AppRole role configuration
//!
//! [`RoleOptions`] describes the full configuration surface of one role.
//! Every field except the name is left out of the request body while it holds
//! its zero value, so the service applies its own defaults instead of the
//! client overriding them.
//!
//! Durations are sent as integer seconds.

use crate::error::{Error, Result};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Type of token issued on login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    /// Service tokens
    Service,
    /// Batch tokens
    Batch,
    /// The mount's tuned default (service unless changed)
    Default,
    /// Service unless the client asks for another type
    DefaultService,
    /// Batch unless the client asks for another type
    DefaultBatch,
}

/// Desired configuration of one named role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOptions {
    /// Role name, used verbatim as the last path segment
    #[serde(rename = "role_name")]
    pub name: String,

    /// Require a secret ID at login. The service defaults to `true`; `None`
    /// leaves it unset.
    #[serde(rename = "bind_secret_id", default, skip_serializing_if = "Option::is_none")]
    pub require_secret_id: Option<bool>,

    /// CIDR blocks allowed to log in with a secret ID
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secret_id_bound_cidrs: Vec<String>,

    /// Uses per secret ID; 0 is unlimited
    #[serde(rename = "secret_id_num_uses", default, skip_serializing_if = "is_zero")]
    pub secret_id_max_uses: u64,

    #[serde(default, with = "duration_secs", skip_serializing_if = "Duration::is_zero")]
    pub secret_id_ttl: Duration,

    /// Cluster-local secret IDs. Can only be set when the role is created.
    #[serde(default, skip_serializing_if = "is_false")]
    pub local_secret_ids: bool,

    #[serde(default, with = "duration_secs", skip_serializing_if = "Duration::is_zero")]
    pub token_ttl: Duration,

    #[serde(default, with = "duration_secs", skip_serializing_if = "Duration::is_zero")]
    pub token_max_ttl: Duration,

    /// Hard cap on token lifetime, even across renewals
    #[serde(default, with = "duration_secs", skip_serializing_if = "Duration::is_zero")]
    pub token_explicit_max_ttl: Duration,

    #[serde(default, with = "duration_secs", skip_serializing_if = "Duration::is_zero")]
    pub token_period: Duration,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_policies: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_bound_cidrs: Vec<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub token_no_default_policy: bool,

    /// Uses per token; 0 is unlimited
    #[serde(default, skip_serializing_if = "is_zero")]
    pub token_num_uses: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

impl RoleOptions {
    /// Create options for a role with every optional field unset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set whether a secret ID is required at login
    pub fn with_require_secret_id(mut self, required: bool) -> Self {
        self.require_secret_id = Some(required);
        self
    }

    /// Set the CIDR blocks allowed to use secret IDs
    pub fn with_secret_id_bound_cidrs<I, S>(mut self, cidrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_id_bound_cidrs = trimmed(cidrs);
        self
    }

    /// Set the number of uses per secret ID
    pub fn with_secret_id_max_uses(mut self, uses: u64) -> Self {
        self.secret_id_max_uses = uses;
        self
    }

    /// Set the secret ID lifetime
    pub fn with_secret_id_ttl(mut self, ttl: Duration) -> Self {
        self.secret_id_ttl = ttl;
        self
    }

    /// Make generated secret IDs cluster-local
    pub fn with_local_secret_ids(mut self, local: bool) -> Self {
        self.local_secret_ids = local;
        self
    }

    /// Set the incremental token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the maximum token lifetime
    pub fn with_token_max_ttl(mut self, ttl: Duration) -> Self {
        self.token_max_ttl = ttl;
        self
    }

    /// Set the explicit max TTL encoded onto tokens
    pub fn with_token_explicit_max_ttl(mut self, ttl: Duration) -> Self {
        self.token_explicit_max_ttl = ttl;
        self
    }

    /// Set the token period (periodic tokens)
    pub fn with_token_period(mut self, period: Duration) -> Self {
        self.token_period = period;
        self
    }

    /// Replace the token policies
    pub fn with_token_policies<I, S>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_policies = policies.into_iter().map(Into::into).collect();
        self
    }

    /// Append a token policy
    pub fn add_token_policy(mut self, policy: impl Into<String>) -> Self {
        self.token_policies.push(policy.into());
        self
    }

    /// Set the CIDR blocks generated tokens are bound to
    pub fn with_token_bound_cidrs<I, S>(mut self, cidrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_bound_cidrs = trimmed(cidrs);
        self
    }

    /// Leave the default policy off generated tokens
    pub fn with_token_no_default_policy(mut self, no_default: bool) -> Self {
        self.token_no_default_policy = no_default;
        self
    }

    /// Set the number of uses per token
    pub fn with_token_num_uses(mut self, uses: u64) -> Self {
        self.token_num_uses = uses;
        self
    }

    /// Set the token type
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    /// Check the name and CIDR lists before anything is sent
    pub fn validate(&self) -> Result<()> {
        validate_role_name(&self.name)?;
        validate_cidrs("secret_id_bound_cidrs", &self.secret_id_bound_cidrs)?;
        validate_cidrs("token_bound_cidrs", &self.token_bound_cidrs)?;
        Ok(())
    }

    /// Encode as the JSON request body
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::EncodingFailed)
    }
}

/// Check that a role name is one the service accepts.
///
/// Names are ASCII letters, digits and `_ - . @`, and must start and end with
/// a letter, digit or `_`.
pub fn validate_role_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("role name must not be empty".into()));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@')))
    {
        return Err(Error::InvalidInput(format!(
            "role name {:?} contains forbidden character {:?}",
            name, c
        )));
    }
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !name.starts_with(is_word) || !name.ends_with(is_word) {
        return Err(Error::InvalidInput(format!(
            "role name {:?} must start and end with a letter, digit or '_'",
            name
        )));
    }
    Ok(())
}

/// Accepts CIDR blocks and bare addresses, exactly as they will be sent
fn validate_cidrs(field: &str, cidrs: &[String]) -> Result<()> {
    for cidr in cidrs {
        if cidr.parse::<IpNet>().is_err() && cidr.parse::<IpAddr>().is_err() {
            return Err(Error::InvalidInput(format!(
                "{}: {:?} is not a CIDR block or IP address",
                field, cidr
            )));
        }
    }
    Ok(())
}

fn trimmed<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|v| v.into().trim().to_string())
        .collect()
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Whole-second durations as integers
mod duration_secs {
    use serde::{ser::Error as _, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_nanos() != 0 {
            return Err(S::Error::custom(format!(
                "duration {:?} is not a whole number of seconds",
                duration
            )));
        }
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
