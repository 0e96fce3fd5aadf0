//! Outbound request decoration.
//!
//! A [`RequestFilter`] takes an [`OutboundRequest`] and the per-call
//! [`CallContext`] and returns the request with extra headers set. The
//! [`WebClient`](crate::client::WebClient) runs its filters left-to-right
//! before every transmission. Submodules provide correlation headers
//! ([`correlation`]), the tenant tag ([`tenant`]), and bearer token
//! injection ([`token`]).

pub mod correlation;
pub mod tenant;
pub mod token;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use url::Url;

use crate::context::CallContext;
use crate::error::ClientError;

pub use correlation::CorrelationFilter;
pub use tenant::TenantFilter;
pub use token::TokenFilter;

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// A POST carrying a JSON body, accepting JSON back.
    #[must_use]
    pub fn post_json(url: Url, body: impl Into<Bytes>) -> Self {
        let mut request = Self::new(Method::POST, url);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        request.body = body.into();
        request
    }

    #[must_use]
    pub fn accept(mut self, value: &'static str) -> Self {
        self.headers.insert(ACCEPT, HeaderValue::from_static(value));
        self
    }

    /// Header value as a string, for assertions and log fields.
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

// async_trait is required here because filters are held as Arc<dyn RequestFilter>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait RequestFilter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn filter(
        &self,
        request: OutboundRequest,
        ctx: &CallContext,
    ) -> Result<OutboundRequest, ClientError>;
}

pub type FilterObject = Arc<dyn RequestFilter>;

/// Run `filters` over `request` in the order given.
pub async fn apply_all(
    filters: &[FilterObject],
    mut request: OutboundRequest,
    ctx: &CallContext,
) -> Result<OutboundRequest, ClientError> {
    for filter in filters {
        request = filter.filter(request, ctx).await?;
        tracing::trace!(
            call_id = %ctx.call_id(),
            filter = filter.name(),
            url = %request.url,
            "request filter applied"
        );
    }
    Ok(request)
}
