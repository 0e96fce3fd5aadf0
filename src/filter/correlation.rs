//! Consumer and call-id headers.
//!
//! Sets `Nav-Consumer-Id` and the call id under both `Nav-Call-Id` and the
//! older `Nav-CallId`. Headers are inserted, not appended, so applying the
//! filter twice leaves one value per header.

use async_trait::async_trait;
use http::{HeaderName, HeaderValue};

use super::{OutboundRequest, RequestFilter};
use crate::context::CallContext;
use crate::error::ClientError;

pub const NAV_CONSUMER_ID: HeaderName = HeaderName::from_static("nav-consumer-id");
pub const NAV_CALL_ID: HeaderName = HeaderName::from_static("nav-call-id");
/// Legacy spelling still read by some downstream services.
pub const NAV_CALL_ID_LEGACY: HeaderName = HeaderName::from_static("nav-callid");

#[derive(Debug, Clone)]
pub struct CorrelationFilter {
    fallback_consumer: String,
}

impl CorrelationFilter {
    /// `fallback_consumer` is sent when the call context has no consumer id,
    /// normally the application name.
    #[must_use]
    pub fn new(fallback_consumer: impl Into<String>) -> Self {
        Self {
            fallback_consumer: fallback_consumer.into(),
        }
    }

    fn consumer_id<'a>(&'a self, ctx: &'a CallContext) -> &'a str {
        ctx.consumer_id().unwrap_or(&self.fallback_consumer)
    }
}

#[async_trait]
impl RequestFilter for CorrelationFilter {
    fn name(&self) -> &'static str {
        "correlation"
    }

    async fn filter(
        &self,
        mut request: OutboundRequest,
        ctx: &CallContext,
    ) -> Result<OutboundRequest, ClientError> {
        let consumer = HeaderValue::from_str(self.consumer_id(ctx))
            .or_else(|_| HeaderValue::from_str(&self.fallback_consumer));
        match consumer {
            Ok(val) => {
                request.headers.insert(NAV_CONSUMER_ID, val);
            }
            Err(_) => {
                tracing::warn!(
                    consumer_id = %self.fallback_consumer,
                    "invalid consumer id header value, skipping"
                );
            }
        }

        let call_id = HeaderValue::from_str(ctx.call_id()).or_else(|_| {
            let generated = uuid::Uuid::new_v4().to_string();
            tracing::warn!(call_id = ?ctx.call_id(), replacement = %generated, "invalid call id");
            HeaderValue::from_str(&generated)
        });
        if let Ok(val) = call_id {
            request.headers.insert(NAV_CALL_ID, val.clone());
            request.headers.insert(NAV_CALL_ID_LEGACY, val);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn request() -> OutboundRequest {
        OutboundRequest::get(Url::parse("https://pdl-api.example.com/graphql").unwrap())
    }

    #[tokio::test]
    async fn uses_context_consumer_id_when_set() {
        let filter = CorrelationFilter::new("aap-soknad-api");
        let ctx = CallContext::new().with_consumer_id("aap-innsyn");

        let result = filter.filter(request(), &ctx).await.unwrap();

        assert_eq!(result.header_str("nav-consumer-id"), Some("aap-innsyn"));
    }

    #[tokio::test]
    async fn falls_back_to_application_name() {
        let filter = CorrelationFilter::new("aap-soknad-api");

        let result = filter.filter(request(), &CallContext::new()).await.unwrap();

        assert_eq!(result.header_str("nav-consumer-id"), Some("aap-soknad-api"));
    }

    #[tokio::test]
    async fn both_call_id_headers_carry_the_same_value() {
        let filter = CorrelationFilter::new("aap-soknad-api");
        let ctx = CallContext::new().with_call_id("call-42");

        let result = filter.filter(request(), &ctx).await.unwrap();

        assert_eq!(result.header_str("nav-call-id"), Some("call-42"));
        assert_eq!(result.header_str("nav-callid"), Some("call-42"));
    }

    #[tokio::test]
    async fn generated_call_id_is_never_empty() {
        let filter = CorrelationFilter::new("aap-soknad-api");

        let result = filter.filter(request(), &CallContext::new()).await.unwrap();

        let call_id = result.header_str("nav-call-id").unwrap();
        assert!(!call_id.is_empty());
        assert_eq!(result.header_str("nav-callid"), Some(call_id));
    }

    #[tokio::test]
    async fn unsendable_ids_fall_back_instead_of_dropping_headers() {
        let filter = CorrelationFilter::new("aap-soknad-api");
        let ctx = CallContext::new()
            .with_call_id("abc\n123")
            .with_consumer_id("bad\u{7}id");

        let result = filter.filter(request(), &ctx).await.unwrap();

        assert_eq!(result.header_str("nav-consumer-id"), Some("aap-soknad-api"));
        let call_id = result.header_str("nav-call-id").unwrap();
        assert_eq!(call_id, ctx.call_id());
        assert!(!call_id.is_empty());
        assert_eq!(result.header_str("nav-callid"), Some(call_id));
    }

    #[tokio::test]
    async fn applying_twice_keeps_single_values() {
        let filter = CorrelationFilter::new("aap-soknad-api");
        let ctx = CallContext::new();

        let once = filter.filter(request(), &ctx).await.unwrap();
        let twice = filter.filter(once.clone(), &ctx).await.unwrap();

        assert_eq!(twice.headers.get_all(NAV_CALL_ID).iter().count(), 1);
        assert_eq!(twice.headers.get_all(NAV_CONSUMER_ID).iter().count(), 1);
        assert_eq!(once.headers, twice.headers);
    }
}
