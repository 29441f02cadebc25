//! Outbound service probes
//!
//! A probe is a single HTTP GET with a short timeout against the address a
//! service is configured at. Any transport error (timeout, connection
//! refused, DNS failure) or non-200 response maps to a "down" verdict; a
//! probe never fails the request that triggered it.

use crate::config::Service;
use serde::Serialize;
use std::time::Duration;

/// Client-side probe timeout, covers connect + response
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Verdict for one probe of one service
///
/// Ephemeral: computed fresh on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub service_name: String,
    pub status: String,
}

/// Probe a service at `{protocol}://{ipAddress}:{port}`
///
/// The response body is discarded; only transport success and the status
/// code matter. "up" requires the status to be exactly 200.
pub async fn check(client: &reqwest::Client, service: &Service) -> CheckResult {
    let url = format!(
        "{}://{}:{}",
        service.protocol, service.ip_address, service.port
    );

    let status = match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(resp) if resp.status() == reqwest::StatusCode::OK => "up",
        Ok(_) | Err(_) => "down",
    };

    CheckResult {
        service_name: service.service_name.clone(),
        status: status.to_string(),
    }
}

#[cfg(test)]
#[path = "checker_test.rs"]
mod tests;
