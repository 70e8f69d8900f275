//! Text-generation transports for Fable.
//!
//! This crate provides concrete [`ExchangeDriver`](fable_interface::ExchangeDriver)
//! implementations and decorators over them.
//!
//! # Available Transports
//!
//! - [`OllamaDriver`]: a local Ollama server, threading its numeric context
//! - [`RetryingDriver`]: retries transient transport failures of any driver
//!
//! # Example
//!
//! ```no_run
//! use fable_core::ExchangeRequest;
//! use fable_interface::ExchangeDriver;
//! use fable_models::{OllamaDriver, RetryPolicy, RetryingDriver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = RetryingDriver::new(OllamaDriver::new()?, RetryPolicy::default());
//! let request = ExchangeRequest::new("mistral", "Say hello in JSON");
//! let response = driver.exchange(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ollama;
mod retry;

pub use ollama::{OllamaConfig, OllamaConfigBuilder, OllamaDriver};
pub use retry::{RetryPolicy, RetryingDriver};
