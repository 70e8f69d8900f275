//! Error types for the Fable library.
//!
//! This crate provides the foundation error types used throughout the Fable workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Two conditions matter most to callers of the story orchestrator and are kept
//! deliberately apart:
//! - [`ExchangeError`]: the text-generation service could not be reached or
//!   answered with an error. Conversation continuity is broken.
//! - [`StructuredResponseError`]: the service answered, but the reply did not
//!   contain the structured fields a step expected. Carries the step and raw text.
//!
//! # Examples
//!
//! ```
//! use fable_error::{ExchangeError, ExchangeErrorKind, FableResult};
//!
//! fn call_service() -> FableResult<String> {
//!     Err(ExchangeError::new(ExchangeErrorKind::ServerNotRunning(
//!         "http://localhost:11434".to_string(),
//!     )))?
//! }
//!
//! let err = call_service().unwrap_err();
//! assert!(err.is_transport());
//! assert!(!err.is_malformed_response());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod exchange;
mod json;
mod storage;
mod story;
mod structured;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{FableError, FableErrorKind, FableResult};
pub use exchange::{ExchangeError, ExchangeErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use story::{StoryError, StoryErrorKind};
pub use structured::{ExchangeStep, StructuredResponseError, StructuredResponseErrorKind};
