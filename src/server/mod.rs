//! HTTP server for the status page
//!
//! Endpoints:
//! - `/` - static dashboard assets
//! - `/version` - build version
//! - `/healthz` - liveness (process is running)
//! - `/readyz` - readiness (config loading completed)
//! - `/status` - configured service ids
//! - `/status/{serviceId}` - live probe of one configured service
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

mod routes;
pub mod shutdown;

pub use routes::{build_router, run_server, AppState, ReadinessState};
pub use shutdown::{shutdown_channel, wait_for_signal, ShutdownController, ShutdownSignal};

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
