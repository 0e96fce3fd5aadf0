//! PDL person lookups.
//!
//! Two clients are assembled against the same PDL base URI:
//!
//! - the user client ([`assemble_user_client`]): correlation headers, `TEMA`,
//!   then a bearer token exchanged for the caller's own token, matched by
//!   host;
//! - the system client ([`assemble_system_client`]): `TEMA`, then a
//!   client-credentials token from the configured system registration.
//!
//! [`PdlService`] issues one GraphQL query per lookup. Nothing is cached
//! and failures propagate unchanged.

pub mod model;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::client::{HttpClient, WebClient};
use crate::config::model::Config;
use crate::connection::{Named, Pingable, WebClientConnection};
use crate::context::CallContext;
use crate::error::ClientError;
use crate::filter::{CorrelationFilter, FilterObject, OutboundRequest, TenantFilter, TokenFilter};
use crate::tokenx::TokenProvider;
use model::{decode_name, GraphQlRequest, Name, Variables, NAVN_QUERY};

#[must_use]
pub fn assemble_user_client(
    config: &Config,
    http: HttpClient,
    provider: Arc<dyn TokenProvider>,
) -> WebClient {
    let registry = Arc::new(config.token_x.registration.clone());
    let filters: Vec<FilterObject> = vec![
        Arc::new(CorrelationFilter::new(config.application.name.clone())),
        Arc::new(TenantFilter::default()),
        Arc::new(TokenFilter::by_host(registry, provider)),
    ];
    WebClient::assemble(
        config.pdl.base_uri.clone(),
        filters,
        http,
        config.pdl.timeout(),
    )
}

#[must_use]
pub fn assemble_system_client(
    config: &Config,
    http: HttpClient,
    provider: Arc<dyn TokenProvider>,
) -> WebClient {
    let mut filters: Vec<FilterObject> = vec![Arc::new(TenantFilter::default())];
    match config.system_credentials() {
        Some(credentials) => {
            filters.push(Arc::new(TokenFilter::fixed(credentials.clone(), provider)));
        }
        None => {
            tracing::warn!("no system_credentials configured, system client sends unauthenticated");
        }
    }
    WebClient::assemble(
        config.pdl.base_uri.clone(),
        filters,
        http,
        config.pdl.timeout(),
    )
}

#[derive(Debug, Clone)]
pub struct PdlService {
    connection: WebClientConnection,
}

impl PdlService {
    #[must_use]
    pub const fn new(connection: WebClientConnection) -> Self {
        Self { connection }
    }

    #[must_use]
    pub fn user(config: &Config, http: HttpClient, provider: Arc<dyn TokenProvider>) -> Self {
        let client = assemble_user_client(config, http, provider);
        Self::new(WebClientConnection::new(Arc::new(client), config.pdl.clone()))
    }

    #[must_use]
    pub fn system(config: &Config, http: HttpClient, provider: Arc<dyn TokenProvider>) -> Self {
        let client = assemble_system_client(config, http, provider);
        Self::new(WebClientConnection::new(Arc::new(client), config.pdl.clone()))
    }

    #[must_use]
    pub const fn connection(&self) -> &WebClientConnection {
        &self.connection
    }

    fn graphql_uri(&self) -> &Url {
        self.connection.client().base_uri()
    }

    /// Look up the current name of the call's principal.
    pub async fn lookup_name(&self, ctx: &CallContext) -> Result<Name, ClientError> {
        let uri = self.graphql_uri().clone();
        let query = GraphQlRequest {
            query: NAVN_QUERY,
            variables: Variables {
                ident: ctx.principal().map(|p| p.ident.as_str()),
            },
        };
        let body = serde_json::to_vec(&query).map_err(|e| ClientError::Decode {
            url: uri.to_string(),
            source: Box::new(e),
        })?;

        let response = self
            .connection
            .client()
            .retrieve(OutboundRequest::post_json(uri.clone(), body), ctx)
            .await?;

        let name = decode_name(&uri, &response.body)?;
        tracing::trace!(call_id = %ctx.call_id(), "name looked up");
        Ok(name)
    }
}

#[async_trait]
impl Pingable for PdlService {
    fn ping_endpoint(&self) -> Url {
        self.connection.ping_endpoint()
    }

    async fn ping(&self) -> Result<String, ClientError> {
        self.connection.ping().await
    }
}

impl Named for PdlService {
    fn name(&self) -> String {
        self.connection.name()
    }
}
