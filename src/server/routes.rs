//! Status page endpoints
//!
//! The router is built once at startup from the loaded config. Per-service
//! status lookups go through an explicit id-to-service map built at
//! construction time; unknown ids get a 404 rather than falling through to
//! the static file server.

use crate::checker;
use crate::config::{Config, Service};
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::error;

use super::shutdown::ShutdownSignal;

/// Directory of static dashboard assets served at `/`
const STATIC_DIR: &str = "./html";

/// Shared state for readiness tracking
///
/// Set exactly once, after config loading completes (real file or
/// fallback), and read by the `/readyz` handler. Write-once-then-read-only,
/// so a plain atomic is all the locking this needs.
#[derive(Debug, Clone)]
pub struct ReadinessState {
    ready: Arc<std::sync::atomic::AtomicBool>,
}

impl ReadinessState {
    /// Create a new readiness state (initially not ready)
    pub fn new() -> Self {
        Self {
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// Mark initialization as complete
    pub fn set_ready(&self) {
        self.ready.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check whether initialization has completed
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Services in config order, for the `/status` listing
    services: Arc<Vec<Service>>,
    /// Lookup by serviceId, for `/status/{serviceId}`
    by_id: Arc<HashMap<String, Service>>,
    readiness: ReadinessState,
    client: reqwest::Client,
}

impl AppState {
    /// Build handler state from the loaded config
    pub fn new(cfg: Config, readiness: ReadinessState, client: reqwest::Client) -> Self {
        let by_id = cfg
            .servers
            .iter()
            .map(|s| (s.service_id.clone(), s.clone()))
            .collect();

        Self {
            services: Arc::new(cfg.servers),
            by_id: Arc::new(by_id),
            readiness,
            client,
        }
    }
}

/// Build version handler
async fn version() -> Json<serde_json::Value> {
    Json(json!({ "Version": env!("CARGO_PKG_VERSION") }))
}

/// Liveness handler
///
/// Always returns 200 - if this responds, the process is alive.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness handler
///
/// Returns 200 once config loading has completed, 503 before.
async fn readyz(State(state): State<AppState>) -> Response {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready" })),
        )
            .into_response()
    }
}

/// List all configured serviceIds, in config order
async fn list_services(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .services
            .iter()
            .map(|s| s.service_id.clone())
            .collect(),
    )
}

/// Probe one configured service and report its verdict
///
/// The probe runs synchronously within the request; probe failures are a
/// "down" verdict, not an HTTP error. Only an internal serialization fault
/// surfaces as a 500.
async fn service_status(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Response {
    let Some(service) = state.by_id.get(&service_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let result = checker::check(&state.client, service).await;

    match serde_json::to_vec(&result) {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(service_id = %service_id, error = %e, "Failed to serialize check result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error checking service status",
            )
                .into_response()
        }
    }
}

/// Build the status page router from handler state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/status", get(list_services))
        .route("/status/{service_id}", get(service_status))
        .fallback_service(ServeDir::new(STATIC_DIR))
        .with_state(state)
}

/// Serve the status page on an already-bound listener
///
/// Stops accepting new connections once the shutdown signal fires and
/// resolves after in-flight requests complete; the caller bounds the drain.
pub async fn run_server(
    listener: TcpListener,
    state: AppState,
    mut shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
