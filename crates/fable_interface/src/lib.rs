//! Trait definitions for the Fable story orchestration library.
//!
//! This crate provides the transport seam between the orchestrator and a
//! concrete text-generation service.

mod traits;
mod types;

pub use traits::{ExchangeDriver, Health};
pub use types::HealthStatus;
