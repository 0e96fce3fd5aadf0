//! Stub upstreams shared by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::Router;
use pdl_client::config::model::Config;

pub type Seen = Arc<Mutex<Vec<HeaderMap>>>;

pub async fn start_stub(router: Router) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// Config pointing PDL at `addr`. The stub host `127.0.0.1` has host key `127`.
pub fn config_for(addr: SocketAddr, extra: &str) -> Config {
    let json = format!(
        r#"{{
            "application": {{"name": "aap-soknad-api"}},
            "pdl": {{
                "base_uri": "http://{addr}/graphql",
                "ping_path": "/internal/isAlive",
                "timeout": 2000
            }}
            {extra}
        }}"#
    );
    serde_json::from_str(&json).unwrap()
}

pub fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
