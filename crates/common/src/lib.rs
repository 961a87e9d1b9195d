//! Wire types shared by the SummitMate API server and its clients.

pub mod types;

pub use types::{HealthStatus, ServiceStatus};
