//! Health reporting for pingable dependencies.
//!
//! [`HealthIndicator`] pings a [`Pingable`] + [`Named`] dependency and
//! turns the outcome into a serializable [`HealthReport`]. A dependency
//! whose endpoint is disabled in config is reported as `disabled` without
//! any network call.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::connection::{Named, Pingable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub name: String,
    pub endpoint: String,
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub latency_ms: u64,
}

impl HealthReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status != HealthStatus::Down
    }
}

pub struct HealthIndicator<'a, P> {
    dependency: &'a P,
    enabled: bool,
}

impl<'a, P> HealthIndicator<'a, P>
where
    P: Pingable + Named,
{
    #[must_use]
    pub const fn new(dependency: &'a P, enabled: bool) -> Self {
        Self {
            dependency,
            enabled,
        }
    }

    pub async fn check(&self) -> HealthReport {
        let name = self.dependency.name();
        let endpoint = self.dependency.ping_endpoint().to_string();

        if !self.enabled {
            return HealthReport {
                name,
                endpoint,
                status: HealthStatus::Disabled,
                detail: None,
                latency_ms: 0,
            };
        }

        let start = Instant::now();
        let result = self.dependency.ping().await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(body) => {
                tracing::debug!(name = %name, latency_ms, "dependency is up");
                HealthReport {
                    name,
                    endpoint,
                    status: HealthStatus::Up,
                    detail: (!body.trim().is_empty()).then(|| body.trim().to_string()),
                    latency_ms,
                }
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, latency_ms, "dependency is down");
                HealthReport {
                    name,
                    endpoint,
                    status: HealthStatus::Down,
                    detail: Some(e.to_string()),
                    latency_ms,
                }
            }
        }
    }
}
