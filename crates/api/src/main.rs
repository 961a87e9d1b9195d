//! API server entry point.

use std::process::ExitCode;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use summitmate_api::config::Config;
use summitmate_api::{AppState, Server, telemetry};
use tokio::signal;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration (a local .env file is optional)
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // 2. Initialize tracing
    telemetry::init(&config);

    // 3. Install Prometheus metrics recorder
    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(err) => {
            tracing::warn!(error = %err, "metrics recorder not installed, /metrics will be empty");
            PrometheusBuilder::new().build_recorder().handle()
        }
    };

    // 4. Build the application
    let state = Arc::new(AppState::from_config(&config));
    let app = summitmate_api::create_app(state, metrics_handle, &config);

    // 5. Bind; this is the only fatal startup failure
    let server = match Server::bind(&config.addr(), app).await {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(error = %err, "failed to start server");
            return ExitCode::FAILURE;
        }
    };
    let addr = server.local_addr();
    tracing::info!(%addr, version = %config.version, "SummitMate API starting");
    tracing::info!("API docs: http://{addr}/docs");

    // 6. Serve until signalled
    if let Err(err) = server.run_until(shutdown_signal()).await {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("server shut down gracefully");
    ExitCode::SUCCESS
}
