//! Token exchange: credential matching and token acquisition.
//!
//! [`find_match`] picks the credential registration for a target URL by
//! the first DNS label of its host. A miss is a normal outcome and yields
//! `None`; the [`TokenFilter`](crate::filter::TokenFilter) then sends the
//! request without a bearer token. [`provider`] turns a matched
//! registration into an access token.

pub mod provider;

use std::collections::HashMap;

use url::Url;

use crate::config::model::CredentialConfig;

pub use provider::{OAuth2TokenService, TokenProvider};

/// Credential registrations keyed by host key.
pub type CredentialRegistry = HashMap<String, CredentialConfig>;

/// First DNS label of the URL's host, or `""` when the URL has no host.
#[must_use]
pub fn host_key(uri: &Url) -> &str {
    let host = uri.host_str().unwrap_or_default();
    host.split('.').next().unwrap_or(host)
}

#[must_use]
pub fn find_match<'a>(registry: &'a CredentialRegistry, uri: &Url) -> Option<&'a CredentialConfig> {
    let host = uri.host_str().unwrap_or_default();
    tracing::trace!(host = %host, "looking up token exchange config");

    let matched = registry.get(host_key(uri));
    if matched.is_some() {
        tracing::trace!(host = %host, "token exchange config found");
    } else {
        tracing::trace!(host = %host, "no token exchange config found");
    }
    matched
}
