//! SummitMate HTTP API server.
//!
//! Serves a versioned route group (`/api/v1`) with a liveness probe, the
//! OpenAPI document generated from the handlers, a browsable reference UI and
//! Prometheus metrics. Every request passes through the stack in
//! [`middleware`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;

use config::Config;
use openapi::{GeneratedSchema, SchemaSource};

pub use error::{ApiError, SchemaError, ServerError};
pub use server::{Server, ServerHandle};

/// Prefix of the versioned route group.
pub const API_V1_PREFIX: &str = "/api/v1";

/// Shared, read-only application state.
pub struct AppState {
    /// Version reported by the health endpoint.
    pub version: String,
    /// Source of the `/openapi.json` document.
    pub schema: Arc<dyn SchemaSource>,
}

impl AppState {
    pub fn new(version: impl Into<String>, schema: Arc<dyn SchemaSource>) -> Self {
        Self {
            version: version.into(),
            schema,
        }
    }

    /// State backed by the generated document for the configured version.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.version.clone(),
            Arc::new(GeneratedSchema::new(config.version.clone())),
        )
    }
}

/// Routes mounted under [`API_V1_PREFIX`].
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(routes::health::check))
}

/// Route table without middleware.
pub fn router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .nest(API_V1_PREFIX, api_v1_routes())
        .route("/openapi.json", get(routes::docs::openapi_json))
        .route("/docs", get(routes::docs::reference))
        .with_state(state)
        .merge(metrics_router)
}

/// Creates the Axum application router with all routes, shared state and middleware.
pub fn create_app(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    config: &Config,
) -> Router {
    middleware::apply(router(state, metrics_handle), config.request_timeout)
}
