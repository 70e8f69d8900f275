//! Fable - illustrated story generation
//!
//! Fable drives a local text-generation model through a chain of prompts that
//! share one conversation context, turning a protagonist and a genre into
//! story pages, per-page render prompts, and a title page.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fable::{FableConfig, OllamaDriver, RetryingDriver, tell_story};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FableConfig::load(None)?;
//!     let params = config.story_parameters()?;
//!     let driver = RetryingDriver::new(OllamaDriver::with_config(config.ollama.clone())?, config.retry);
//!
//!     let output = tell_story(driver, &params, &config.story.output_dir).await?;
//!     println!("Wrote {}", output.dir().display());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//! - `api` - Tests that need a running Ollama server
//!
//! # Architecture
//!
//! - `fable_error` - Error types
//! - `fable_core` - Parameters, pages, registry, conversation context
//! - `fable_interface` - `ExchangeDriver` trait
//! - `fable_models` - Ollama driver and retry decorator
//! - `fable_narrative` - Story orchestrator and title page synthesizer
//!
//! This crate (`fable`) re-exports everything and adds configuration, output
//! files, and the `fable` binary.

mod config;
mod output;
mod session;

pub use config::{CharacterSettings, FableConfig, StorySettings};
pub use output::{METADATA_FILE, STORY_FILE, StoryMetadata, write_story, write_story_to};
pub use session::{StoryOutput, tell_story};

pub use fable_core::*;
pub use fable_error::*;
pub use fable_interface::*;
pub use fable_models::*;
pub use fable_narrative::{
    ConversationThread, PAGE_PIPELINE, PageStage, StoryOrchestrator, TITLE_PAGE_BACKGROUND,
};

#[cfg(feature = "observability")]
pub mod otel;
