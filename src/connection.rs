//! Liveness capabilities of an upstream dependency.
//!
//! [`Pingable`] and [`Named`] are independent traits; a dependency that
//! needs both implements both. [`WebClientConnection`] implements them for
//! an assembled [`WebClient`] and its [`EndpointConfig`], and is what domain
//! services such as [`PdlService`](crate::pdl::PdlService) build on.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::client::WebClient;
use crate::config::model::EndpointConfig;
use crate::context::CallContext;
use crate::error::ClientError;
use crate::filter::OutboundRequest;

const PING_ACCEPT: &str = "application/json, text/plain";

#[async_trait]
pub trait Pingable: Send + Sync {
    fn ping_endpoint(&self) -> Url;

    /// GET the ping endpoint and return its body. Any non-2xx status,
    /// transport failure, or empty body is an error.
    async fn ping(&self) -> Result<String, ClientError>;
}

pub trait Named {
    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct WebClientConnection {
    client: Arc<WebClient>,
    cfg: EndpointConfig,
}

impl WebClientConnection {
    #[must_use]
    pub const fn new(client: Arc<WebClient>, cfg: EndpointConfig) -> Self {
        Self { client, cfg }
    }

    #[must_use]
    pub fn client(&self) -> &WebClient {
        &self.client
    }

    #[must_use]
    pub const fn config(&self) -> &EndpointConfig {
        &self.cfg
    }
}

#[async_trait]
impl Pingable for WebClientConnection {
    fn ping_endpoint(&self) -> Url {
        self.cfg.ping_endpoint()
    }

    async fn ping(&self) -> Result<String, ClientError> {
        let ctx = CallContext::new();
        let endpoint = self.ping_endpoint();
        let request = OutboundRequest::get(endpoint.clone()).accept(PING_ACCEPT);

        let response = self.client.retrieve(request, &ctx).await?;
        if response.body.is_empty() {
            return Err(ClientError::EmptyBody {
                url: endpoint.to_string(),
            });
        }

        tracing::debug!(call_id = %ctx.call_id(), name = %self.name(), "ping ok");
        Ok(response.text())
    }
}

impl Named for WebClientConnection {
    fn name(&self) -> String {
        self.cfg.name()
    }
}
