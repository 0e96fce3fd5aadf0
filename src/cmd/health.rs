//! `pdl-client health`: report PDL health.
//!
//! Runs the [`HealthIndicator`] against PDL and displays the report as
//! formatted text or raw JSON. A `down` report fails the command.

use std::path::Path;

use crate::cli::HealthArgs;
use crate::config;
use crate::error::ClientError;
use crate::health::{HealthIndicator, HealthStatus};
use crate::pdl::PdlService;

pub async fn execute(config_path: &Path, args: &HealthArgs) -> Result<(), ClientError> {
    let config = config::load(config_path).await?;
    let (http, provider) = super::transport(&config);
    let pdl = PdlService::user(&config, http, provider);

    let enabled = pdl.connection().config().enabled;
    let report = HealthIndicator::new(&pdl, enabled).check().await;

    if args.json {
        let json = serde_json::to_string(&report).map_err(std::io::Error::other)?;
        println!("{json}");
    } else {
        let mark = match report.status {
            HealthStatus::Up => "\u{2713}",
            HealthStatus::Down => "\u{2717}",
            HealthStatus::Disabled => "-",
        };
        println!("{mark} {} is {:?}", report.name, report.status);
        println!("  endpoint: {}", report.endpoint);
        println!("  latency:  {}ms", report.latency_ms);
        if let Some(ref detail) = report.detail {
            println!("  detail:   {detail}");
        }
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(ClientError::HealthCheckFailed {
            name: report.name,
            detail: report.detail.unwrap_or_default(),
        })
    }
}
