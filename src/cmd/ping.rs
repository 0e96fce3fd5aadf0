//! `pdl-client ping`: call the PDL liveness endpoint.
//!
//! Sends a GET through the assembled user client and prints the body.
//! Any non-2xx answer or empty body fails the command.

use std::path::Path;

use crate::config;
use crate::connection::{Named, Pingable};
use crate::error::ClientError;
use crate::pdl::PdlService;

pub async fn execute(config_path: &Path) -> Result<(), ClientError> {
    let config = config::load(config_path).await?;
    let (http, provider) = super::transport(&config);
    let pdl = PdlService::user(&config, http, provider);

    tracing::info!(name = %pdl.name(), endpoint = %pdl.ping_endpoint(), "pinging");
    let body = pdl.ping().await?;
    println!("{body}");
    Ok(())
}
