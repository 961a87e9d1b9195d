use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reported liveness of the service.
///
/// A process that can answer at all is alive, so `Ok` is the only value the
/// server ever produces. Serialized in lowercase (`"ok"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Ok => write!(f, "ok"),
        }
    }
}

/// Body of the health endpoint.
///
/// Built fresh for every probe; it has no identity and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Current service status.
    pub status: ServiceStatus,
    /// Semantic version of the running service.
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthStatus {
    /// Creates a healthy status report for the given version.
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Ok,
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_serializes_in_field_order() {
        let json = serde_json::to_string(&HealthStatus::ok("0.1.0")).unwrap();
        assert_eq!(json, r#"{"status":"ok","version":"0.1.0"}"#);
    }

    #[test]
    fn service_status_uses_lowercase_wire_value() {
        let status: ServiceStatus = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(status, ServiceStatus::Ok);
        assert!(serde_json::from_str::<ServiceStatus>("\"Ok\"").is_err());
    }

    #[test]
    fn service_status_display_matches_wire_value() {
        assert_eq!(ServiceStatus::Ok.to_string(), "ok");
    }

    #[test]
    fn health_status_rejects_missing_version() {
        let result = serde_json::from_str::<HealthStatus>(r#"{"status":"ok"}"#);
        assert!(result.is_err());
    }
}
