use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use upcheck::config;
use upcheck::server::{run_server, shutdown_channel, wait_for_signal, AppState, ReadinessState};

/// Fixed listen port for the status page
const LISTEN_PORT: u16 = 8088;

/// Window in-flight requests get to finish after a termination signal
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting upcheck status server"
    );

    // Load config; readiness flips once loading completes, real file or fallback
    let readiness = ReadinessState::new();
    let cfg = config::load(&readiness);

    // One probe client shared by all handlers
    let client = reqwest::Client::new();
    let state = AppState::new(cfg, readiness, client);

    let (shutdown_controller, shutdown_signal) = shutdown_channel();

    // Bind before spawning so a bad port is fatal at startup
    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind listener");
            return Err(e.into());
        }
    };
    info!(addr = %addr, "Status server listening");

    let server_handle = tokio::spawn(run_server(listener, state, shutdown_signal));

    let signal = wait_for_signal().await;
    info!(signal = signal, "Initiating graceful shutdown");
    shutdown_controller.shutdown();

    // Bounded drain: in-flight requests get DRAIN_TIMEOUT to finish
    match tokio::time::timeout(DRAIN_TIMEOUT, server_handle).await {
        Ok(Ok(Ok(()))) => {
            info!("Server stopped");
            Ok(())
        }
        Ok(Ok(Err(e))) => {
            error!(error = %e, "Server error during shutdown");
            Err(e.into())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Server task failed");
            Err(e.into())
        }
        Err(_) => {
            error!(
                drain_secs = DRAIN_TIMEOUT.as_secs(),
                "Shutdown drain timed out, forcing exit"
            );
            anyhow::bail!("shutdown drain exceeded {}s", DRAIN_TIMEOUT.as_secs())
        }
    }
}
