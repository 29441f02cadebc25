//! Tests for the status page endpoints

use super::*;
use crate::config::{Config, Service};
use crate::server::shutdown::{shutdown_channel, ShutdownController};
use axum::http::StatusCode as AxStatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

fn service(id: &str, name: &str, ip: &str, port: u16) -> Service {
    Service {
        service_id: id.to_string(),
        service_name: name.to_string(),
        ip_address: ip.to_string(),
        port,
        protocol: "http".to_string(),
    }
}

/// Start the status server on an ephemeral port
///
/// The returned controller must stay alive for the duration of the test;
/// dropping it shuts the server down.
async fn spawn_app(cfg: Config, readiness: ReadinessState) -> (String, ShutdownController) {
    let state = AppState::new(cfg, readiness, reqwest::Client::new());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let (controller, signal) = shutdown_channel();
    tokio::spawn(run_server(listener, state, signal));

    (base_url, controller)
}

/// Spawn a downstream target for probe-backed endpoint tests
async fn spawn_target(router: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind target listener");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    port
}

#[tokio::test]
async fn test_version_returns_build_version() {
    let readiness = ReadinessState::new();
    let (url, _controller) = spawn_app(Config::default(), readiness).await;

    let response = reqwest::get(format!("{}/version", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["Version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_healthz_returns_200_regardless_of_readiness() {
    // Liveness must not depend on config load state
    let readiness = ReadinessState::new();
    assert!(!readiness.is_ready());
    let (url, _controller) = spawn_app(Config::default(), readiness).await;

    let response = reqwest::get(format!("{}/healthz", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_readyz_returns_503_before_ready() {
    let readiness = ReadinessState::new();
    let (url, _controller) = spawn_app(Config::default(), readiness).await;

    let response = reqwest::get(format!("{}/readyz", url)).await.unwrap();

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "not ready");
}

#[tokio::test]
async fn test_readyz_returns_200_after_ready() {
    let readiness = ReadinessState::new();
    readiness.set_ready();
    let (url, _controller) = spawn_app(Config::default(), readiness).await;

    let response = reqwest::get(format!("{}/readyz", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_status_lists_service_ids_in_config_order() {
    let cfg = Config {
        servers: vec![
            service("svc1", "Service 1", "10.0.0.1", 80),
            service("svc2", "Service 2", "10.0.0.2", 80),
        ],
    };
    let (url, _controller) = spawn_app(cfg, ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let ids: Vec<String> = response.json().await.unwrap();
    assert_eq!(ids, vec!["svc1", "svc2"]);
}

#[tokio::test]
async fn test_status_empty_config_returns_empty_array() {
    let (url, _controller) = spawn_app(Config::default(), ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let ids: Vec<String> = response.json().await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_service_status_reports_up_for_healthy_target() {
    let target_port = spawn_target(Router::new().route("/", get(|| async { "ok" }))).await;
    let cfg = Config {
        servers: vec![service("target", "Target Service", "127.0.0.1", target_port)],
    };
    let (url, _controller) = spawn_app(cfg, ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status/target", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["service_name"], "Target Service");
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn test_service_status_reports_down_for_non_200_target() {
    let target_port = spawn_target(Router::new().route(
        "/",
        get(|| async { AxStatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;
    let cfg = Config {
        servers: vec![service("flaky", "Flaky Service", "127.0.0.1", target_port)],
    };
    let (url, _controller) = spawn_app(cfg, ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status/flaky", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["service_name"], "Flaky Service");
    assert_eq!(body["status"], "down");
}

#[tokio::test]
async fn test_service_status_reports_down_for_unreachable_target() {
    // Port 1 is never listening in test environments
    let cfg = Config {
        servers: vec![service("dead", "Dead Service", "127.0.0.1", 1)],
    };
    let (url, _controller) = spawn_app(cfg, ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status/dead", url)).await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "down");
}

#[tokio::test]
async fn test_service_status_unknown_id_returns_404() {
    let cfg = Config {
        servers: vec![service("known", "Known Service", "10.0.0.1", 80)],
    };
    let (url, _controller) = spawn_app(cfg, ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/status/unknown", url)).await.unwrap();

    assert_eq!(response.status(), 404);
}

#[test]
fn test_readiness_state_transitions() {
    let state = ReadinessState::new();

    // Initially not ready
    assert!(!state.is_ready());

    // After set_ready, should be ready
    state.set_ready();
    assert!(state.is_ready());

    // Clone should share state
    let cloned = state.clone();
    assert!(cloned.is_ready());
}
