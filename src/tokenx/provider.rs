//! Access token acquisition for matched credential registrations.
//!
//! [`OAuth2TokenService`] posts a form-encoded grant to the registration's
//! token endpoint over the shared hyper client. `token_exchange` swaps the
//! caller's own token for one scoped to `audience`; `client_credentials`
//! fetches a token for the application itself. Secrets go in the form body
//! (`client_secret_post`). Tokens are fetched per call and not cached.

use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::HeaderValue;
use serde::Deserialize;

use crate::client::{self, HttpClient};
use crate::config::model::{CredentialConfig, GrantType};
use crate::context::CallContext;
use crate::error::ClientError;
use crate::filter::OutboundRequest;

const SUBJECT_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:jwt";

// async_trait keeps TokenProvider object-safe for Arc<dyn TokenProvider>.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(
        &self,
        credentials: &CredentialConfig,
        ctx: &CallContext,
    ) -> Result<String, ClientError>;
}

/// Token endpoint answer. Fields beyond these are ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl TokenResponse {
    /// The access token, if it can be sent as `Authorization: Bearer`.
    pub fn into_bearer(self, credentials: &CredentialConfig) -> Result<String, ClientError> {
        if self.access_token.is_empty() {
            return Err(token_error(credentials, "empty access_token"));
        }
        match self.token_type {
            Some(ref kind) if !kind.eq_ignore_ascii_case("bearer") => Err(token_error(
                credentials,
                format!("unsupported token_type '{kind}', expected Bearer"),
            )),
            _ => Ok(self.access_token),
        }
    }
}

#[derive(Clone)]
pub struct OAuth2TokenService {
    http: HttpClient,
    timeout: Duration,
}

impl OAuth2TokenService {
    #[must_use]
    pub const fn new(http: HttpClient, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

fn token_error(credentials: &CredentialConfig, reason: impl Into<String>) -> ClientError {
    ClientError::TokenRequest {
        endpoint: credentials.token_endpoint.to_string(),
        reason: reason.into(),
    }
}

/// Form body for the grant configured in `credentials`.
pub fn grant_form(
    credentials: &CredentialConfig,
    ctx: &CallContext,
) -> Result<String, ClientError> {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("grant_type", credentials.grant_type.as_str());

    match credentials.grant_type {
        GrantType::TokenExchange => {
            let subject_token = ctx
                .subject_token()
                .ok_or_else(|| token_error(credentials, "token exchange needs a subject token"))?;
            form.append_pair("subject_token_type", SUBJECT_TOKEN_TYPE);
            form.append_pair("subject_token", subject_token);
            if let Some(ref audience) = credentials.audience {
                form.append_pair("audience", audience);
            }
        }
        GrantType::ClientCredentials => {
            if let Some(ref scope) = credentials.scope {
                form.append_pair("scope", scope);
            }
        }
    }

    form.append_pair("client_id", &credentials.client_id);
    if let Some(ref secret) = credentials.client_secret {
        form.append_pair("client_secret", secret);
    }
    Ok(form.finish())
}

#[async_trait]
impl TokenProvider for OAuth2TokenService {
    async fn access_token(
        &self,
        credentials: &CredentialConfig,
        ctx: &CallContext,
    ) -> Result<String, ClientError> {
        let mut request =
            OutboundRequest::new(http::Method::POST, credentials.token_endpoint.clone());
        request.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        request.body = grant_form(credentials, ctx)?.into();

        let response = client::send(&self.http, request, self.timeout).await?;
        if !response.status.is_success() {
            return Err(token_error(
                credentials,
                format!("status {}: {}", response.status, response.text()),
            ));
        }

        let token: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| token_error(credentials, format!("unreadable token response: {e}")))?;
        let expires_in = token.expires_in.unwrap_or_default();
        let access_token = token.into_bearer(credentials)?;

        tracing::debug!(
            call_id = %ctx.call_id(),
            client_id = %credentials.client_id,
            audience = credentials.audience.as_deref().unwrap_or_default(),
            expires_in,
            "access token obtained"
        );
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Principal;
    use url::Url;

    fn credentials(grant_type: GrantType) -> CredentialConfig {
        CredentialConfig {
            token_endpoint: Url::parse("https://tokenx.example.com/token").unwrap(),
            grant_type,
            client_id: "dev-gcp:aap:soknad-api".into(),
            client_secret: Some("s3cr3t".into()),
            audience: Some("dev-fss:pdl:pdl-api".into()),
            scope: Some("api://dev-fss.pdl.pdl-api/.default".into()),
        }
    }

    fn pairs(form: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(form.as_bytes())
            .into_owned()
            .collect()
    }

    fn value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn token_exchange_form_carries_subject_and_audience() {
        let ctx = CallContext::new()
            .with_principal(Principal::new("08089403198").with_token("eyJ.user"));
        let form = grant_form(&credentials(GrantType::TokenExchange), &ctx).unwrap();
        let pairs = pairs(&form);

        assert_eq!(
            value(&pairs, "grant_type"),
            Some("urn:ietf:params:oauth:grant-type:token-exchange")
        );
        assert_eq!(value(&pairs, "subject_token"), Some("eyJ.user"));
        assert_eq!(value(&pairs, "audience"), Some("dev-fss:pdl:pdl-api"));
        assert_eq!(value(&pairs, "client_secret"), Some("s3cr3t"));
        assert_eq!(value(&pairs, "scope"), None);
    }

    #[test]
    fn client_credentials_form_carries_scope_only() {
        let form =
            grant_form(&credentials(GrantType::ClientCredentials), &CallContext::new()).unwrap();
        let pairs = pairs(&form);

        assert_eq!(value(&pairs, "grant_type"), Some("client_credentials"));
        assert_eq!(
            value(&pairs, "scope"),
            Some("api://dev-fss.pdl.pdl-api/.default")
        );
        assert_eq!(value(&pairs, "subject_token"), None);
        assert_eq!(value(&pairs, "audience"), None);
    }

    #[test]
    fn token_exchange_without_subject_token_fails() {
        let result = grant_form(&credentials(GrantType::TokenExchange), &CallContext::new());
        assert!(matches!(result, Err(ClientError::TokenRequest { .. })));
    }

    #[test]
    fn token_response_ignores_unknown_fields() {
        let json = r#"{
            "access_token": "abc",
            "issued_token_type": "urn:ietf:params:oauth:token-type:access_token",
            "token_type": "Bearer",
            "expires_in": 299
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.expires_in, Some(299));
        let creds = credentials(GrantType::TokenExchange);
        assert_eq!(token.into_bearer(&creds).unwrap(), "abc");
    }

    #[test]
    fn bearer_token_type_is_case_insensitive_and_optional() {
        let creds = credentials(GrantType::ClientCredentials);
        for json in [
            r#"{"access_token": "abc", "token_type": "bearer"}"#,
            r#"{"access_token": "abc"}"#,
        ] {
            let token: TokenResponse = serde_json::from_str(json).unwrap();
            assert_eq!(token.into_bearer(&creds).unwrap(), "abc");
        }
    }

    #[test]
    fn non_bearer_or_empty_token_is_rejected() {
        let creds = credentials(GrantType::ClientCredentials);
        for json in [
            r#"{"access_token": "abc", "token_type": "N_A"}"#,
            r#"{"access_token": ""}"#,
        ] {
            let token: TokenResponse = serde_json::from_str(json).unwrap();
            assert!(matches!(
                token.into_bearer(&creds),
                Err(ClientError::TokenRequest { .. })
            ));
        }
    }
}
