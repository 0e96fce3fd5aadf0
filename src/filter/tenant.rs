//! Fixed `TEMA` tenant tag.

use async_trait::async_trait;
use http::{HeaderName, HeaderValue};

use super::{OutboundRequest, RequestFilter};
use crate::context::CallContext;
use crate::error::ClientError;

pub const TEMA: HeaderName = HeaderName::from_static("tema");
pub const AAP: &str = "AAP";

#[derive(Debug, Clone)]
pub struct TenantFilter {
    tema: HeaderValue,
}

impl Default for TenantFilter {
    fn default() -> Self {
        Self {
            tema: HeaderValue::from_static(AAP),
        }
    }
}

#[async_trait]
impl RequestFilter for TenantFilter {
    fn name(&self) -> &'static str {
        "tenant"
    }

    async fn filter(
        &self,
        mut request: OutboundRequest,
        _ctx: &CallContext,
    ) -> Result<OutboundRequest, ClientError> {
        request.headers.insert(TEMA, self.tema.clone());
        Ok(request)
    }
}
