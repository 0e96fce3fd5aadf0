//! Bearer token injection.
//!
//! Credentials are either matched per request from the target host
//! ([`TokenFilter::by_host`]) or fixed for the whole client
//! ([`TokenFilter::fixed`]). When nothing matches, or a token exchange
//! registration matched but the call carries no user token, the request
//! goes out without `Authorization`.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::HeaderValue;

use super::{OutboundRequest, RequestFilter};
use crate::config::model::CredentialConfig;
use crate::context::CallContext;
use crate::error::ClientError;
use crate::tokenx::{find_match, CredentialRegistry, TokenProvider};

#[derive(Debug, Clone)]
enum Credentials {
    ByHost(Arc<CredentialRegistry>),
    Fixed(Arc<CredentialConfig>),
}

#[derive(Clone)]
pub struct TokenFilter {
    credentials: Credentials,
    provider: Arc<dyn TokenProvider>,
}

impl TokenFilter {
    #[must_use]
    pub fn by_host(registry: Arc<CredentialRegistry>, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            credentials: Credentials::ByHost(registry),
            provider,
        }
    }

    #[must_use]
    pub fn fixed(credentials: CredentialConfig, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            credentials: Credentials::Fixed(Arc::new(credentials)),
            provider,
        }
    }

    fn select<'a>(&'a self, request: &OutboundRequest) -> Option<&'a CredentialConfig> {
        match &self.credentials {
            Credentials::ByHost(registry) => find_match(registry, &request.url),
            Credentials::Fixed(credentials) => Some(credentials.as_ref()),
        }
    }
}

#[async_trait]
impl RequestFilter for TokenFilter {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn filter(
        &self,
        mut request: OutboundRequest,
        ctx: &CallContext,
    ) -> Result<OutboundRequest, ClientError> {
        let Some(credentials) = self.select(&request) else {
            return Ok(request);
        };

        if credentials.grant_type.needs_subject_token() && ctx.subject_token().is_none() {
            tracing::trace!(
                call_id = %ctx.call_id(),
                url = %request.url,
                "no subject token on call, sending unauthenticated"
            );
            return Ok(request);
        }

        let token = self.provider.access_token(credentials, ctx).await?;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ClientError::TokenRequest {
                endpoint: credentials.token_endpoint.to_string(),
                reason: format!("token is not a valid header value: {e}"),
            }
        })?;
        request.headers.insert(AUTHORIZATION, bearer);
        Ok(request)
    }
}
