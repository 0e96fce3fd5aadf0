//! Serde data structures for the client configuration file.
//!
//! Contains [`Config`] (the root), [`ApplicationConfig`], [`EndpointConfig`],
//! [`TokenXConfig`] and [`CredentialConfig`]. All types derive `Serialize`
//! and `Deserialize` with `deny_unknown_fields` for strict parsing.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

const fn default_timeout() -> u64 {
    5000
}

const fn default_true() -> bool {
    true
}

fn default_ping_path() -> String {
    "/".to_string()
}

fn default_application_name() -> String {
    "aap-soknad-api".to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_true(v: &bool) -> bool {
    *v
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub application: ApplicationConfig,

    pub pdl: EndpointConfig,

    #[serde(default, skip_serializing_if = "TokenXConfig::is_empty")]
    pub token_x: TokenXConfig,

    /// Registry key of the credentials used by the system (non-user) client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_credentials: Option<String>,
}

impl Config {
    /// Credentials for the system client, if configured and registered.
    #[must_use]
    pub fn system_credentials(&self) -> Option<&CredentialConfig> {
        self.system_credentials
            .as_deref()
            .and_then(|key| self.token_x.registration.get(key))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationConfig {
    /// Fallback `Nav-Consumer-Id` when a call carries no consumer id.
    #[serde(default = "default_application_name")]
    pub name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_application_name(),
        }
    }
}

/// Static description of one upstream dependency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub base_uri: Url,

    #[serde(default = "default_ping_path")]
    pub ping_path: String,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub enabled: bool,

    /// Per-request timeout in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,
}

impl EndpointConfig {
    #[must_use]
    pub fn new(base_uri: Url, ping_path: impl Into<String>, enabled: bool) -> Self {
        Self {
            base_uri,
            ping_path: ping_path.into(),
            enabled,
            timeout: default_timeout(),
        }
    }

    /// `ping_path` joined onto `base_uri`.
    ///
    /// A plain path join: the base keeps its own path and the ping path
    /// is appended with exactly one `/` between them.
    #[must_use]
    pub fn ping_endpoint(&self) -> Url {
        let mut endpoint = self.base_uri.clone();
        let base_path = self.base_uri.path().trim_end_matches('/');
        let ping_path = self.ping_path.trim_start_matches('/');
        endpoint.set_path(&format!("{base_path}/{ping_path}"));
        endpoint
    }

    /// The host component of `base_uri`.
    #[must_use]
    pub fn name(&self) -> String {
        self.base_uri.host_str().unwrap_or_default().to_string()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenXConfig {
    /// Credentials keyed by the first DNS label of the target host.
    #[serde(default)]
    pub registration: HashMap<String, CredentialConfig>,
}

impl TokenXConfig {
    fn is_empty(&self) -> bool {
        self.registration.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// RFC 8693 exchange of the caller's token for an audience-scoped one.
    TokenExchange,
    ClientCredentials,
}

impl GrantType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TokenExchange => "urn:ietf:params:oauth:grant-type:token-exchange",
            Self::ClientCredentials => "client_credentials",
        }
    }

    #[must_use]
    pub const fn needs_subject_token(self) -> bool {
        matches!(self, Self::TokenExchange)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    pub token_endpoint: Url,

    pub grant_type: GrantType,

    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}
