//! Core type definitions for the Fable interface.

/// Health status of a text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    /// Backend is reachable and serves the configured model
    Healthy,
    /// Backend is reachable but something is off, e.g. the model is missing
    Degraded {
        /// Description of the degradation
        message: String,
    },
    /// Backend is not reachable
    Unhealthy {
        /// Description of the problem
        message: String,
    },
}

impl HealthStatus {
    /// Whether the backend can serve exchanges.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}
