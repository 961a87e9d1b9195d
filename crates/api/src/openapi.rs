//! OpenAPI document generated from the handler annotations.

use summitmate_common::{HealthStatus, ServiceStatus};
use utoipa::OpenApi;

use crate::error::SchemaError;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SummitMate API",
        description = "Service health and API description endpoints."
    ),
    paths(routes::health::check, routes::metrics::get),
    components(schemas(HealthStatus, ServiceStatus)),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "observability", description = "Operational telemetry")
    )
)]
pub struct ApiDoc;

/// Produces the serialized API description served at `/openapi.json`.
pub trait SchemaSource: Send + Sync {
    fn document(&self) -> Result<String, SchemaError>;
}

/// Document built from [`ApiDoc`] with the running service version.
#[derive(Debug, Clone)]
pub struct GeneratedSchema {
    version: String,
}

impl GeneratedSchema {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Returns the document as a typed value.
    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        let mut doc = ApiDoc::openapi();
        doc.info.version = self.version.clone();
        doc
    }
}

impl SchemaSource for GeneratedSchema {
    fn document(&self) -> Result<String, SchemaError> {
        Ok(self.openapi().to_json()?)
    }
}
