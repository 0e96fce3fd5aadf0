//! Outbound HTTP client assembly.
//!
//! [`build_http_client`] creates the connection-pooled hyper client shared
//! by every outbound call. [`WebClient`] binds that client to a base URI and
//! an ordered list of [`RequestFilter`](crate::filter::RequestFilter)s; each
//! call runs the filters left-to-right and then hands the request to
//! [`send`]. The timeout covers the whole exchange, body included.

use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use url::Url;

use crate::context::CallContext;
use crate::error::ClientError;
use crate::filter::{apply_all, FilterObject, OutboundRequest};

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // With more than one rustls crypto provider compiled in, rustls cannot
    // pick one on its own.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

#[derive(Debug, Clone)]
pub struct InboundResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundResponse {
    /// Turn a non-2xx answer into [`ClientError::Status`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                url: self.url.to_string(),
                status: self.status,
                body: self.text(),
            })
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transmit a fully decorated request and collect the response body.
pub async fn send(
    http: &HttpClient,
    request: OutboundRequest,
    timeout: Duration,
) -> Result<InboundResponse, ClientError> {
    let url = request.url;
    let transport_error = |e: Box<dyn std::error::Error + Send + Sync>| ClientError::HttpRequest {
        url: url.to_string(),
        source: e,
    };

    let uri: hyper::Uri = url
        .as_str()
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| ClientError::UriParse {
            source: Box::new(e),
        })?;

    let mut req_builder = hyper::Request::builder().method(request.method).uri(uri);
    for (key, value) in &request.headers {
        req_builder = req_builder.header(key, value);
    }
    let req = req_builder
        .body(Full::new(request.body))
        .map_err(|e| transport_error(Box::new(e)))?;

    let exchange = async {
        let response = http
            .request(req)
            .await
            .map_err(|e| transport_error(Box::new(e)))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| transport_error(Box::new(e)))?
            .to_bytes();
        Ok::<_, ClientError>((status, headers, body))
    };

    // Covers the body as well as the response head.
    let (status, headers, body) = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ClientError::Timeout {
            url: url.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })??;

    Ok(InboundResponse {
        url,
        status,
        headers,
        body,
    })
}

/// A base URI plus the filters every call through it passes.
#[derive(Clone)]
pub struct WebClient {
    base_uri: Url,
    filters: Vec<FilterObject>,
    http: HttpClient,
    timeout: Duration,
}

impl std::fmt::Debug for WebClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("WebClient")
            .field("base_uri", &self.base_uri.as_str())
            .field("filters", &filters)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WebClient {
    /// Filters run in exactly the order given. Put token injection last so
    /// it matches against the final target URL.
    #[must_use]
    pub fn assemble(
        base_uri: Url,
        filters: Vec<FilterObject>,
        http: HttpClient,
        timeout: Duration,
    ) -> Self {
        Self {
            base_uri,
            filters,
            http,
            timeout,
        }
    }

    #[must_use]
    pub const fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    #[must_use]
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Filter and send `request`; any status is returned as-is.
    pub async fn exchange(
        &self,
        request: OutboundRequest,
        ctx: &CallContext,
    ) -> Result<InboundResponse, ClientError> {
        let request = apply_all(&self.filters, request, ctx).await?;
        let method = request.method.clone();
        let url = request.url.to_string();

        let start = Instant::now();
        let result = send(&self.http, request, self.timeout).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) => tracing::debug!(
                call_id = %ctx.call_id(),
                method = %method,
                url = %url,
                status = response.status.as_u16(),
                latency_ms,
                "upstream responded"
            ),
            Err(e) => tracing::warn!(
                call_id = %ctx.call_id(),
                method = %method,
                url = %url,
                error = %e,
                latency_ms,
                "upstream request failed"
            ),
        }
        result
    }

    /// Like [`exchange`](Self::exchange), but non-2xx answers are errors.
    pub async fn retrieve(
        &self,
        request: OutboundRequest,
        ctx: &CallContext,
    ) -> Result<InboundResponse, ClientError> {
        self.exchange(request, ctx).await?.error_for_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &'static str) -> InboundResponse {
        InboundResponse {
            url: Url::parse("https://pdl.example.com/internal/isAlive").unwrap(),
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn success_passes_through() {
        let ok = response(StatusCode::OK, "alive").error_for_status().unwrap();
        assert_eq!(ok.text(), "alive");
    }

    #[test]
    fn failure_status_carries_status_and_body() {
        let err = response(StatusCode::SERVICE_UNAVAILABLE, "down")
            .error_for_status()
            .unwrap_err();
        match err {
            ClientError::Status { url, status, body } => {
                assert_eq!(url, "https://pdl.example.com/internal/isAlive");
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn stalled_body_hits_the_timeout() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            // Head and 2 of 10 body bytes, then nothing.
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\n\r\nab")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let url = Url::parse(&format!("http://{addr}/graphql")).unwrap();
        let timeout = Duration::from_millis(200);
        let result = send(&build_http_client(), OutboundRequest::get(url), timeout).await;

        assert!(matches!(
            result,
            Err(ClientError::Timeout { timeout_ms: 200, .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let http = build_http_client();
        let url = Url::parse("http://127.0.0.1:1/graphql").unwrap();
        let result = send(&http, OutboundRequest::get(url), Duration::from_secs(2)).await;
        assert!(matches!(
            result,
            Err(ClientError::HttpRequest { .. } | ClientError::Timeout { .. })
        ));
    }
}
