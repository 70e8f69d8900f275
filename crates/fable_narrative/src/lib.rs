//! Multi-turn story orchestration for Fable.
//!
//! This crate turns [`StoryParameters`](fable_core::StoryParameters) into an
//! illustrated story's pages by threading one conversation through a chain of
//! dependent exchanges with a text-generation service.
//!
//! # Features
//!
//! - **Structured reply parsing**: locate and deserialize the JSON in free text
//! - **Conversation threading**: each exchange continues from the last context
//! - **Per-page pipeline**: named stages that derive render prompts per page
//! - **Title page**: a cover composed from the finished story
//!
//! # Example
//!
//! ```rust,ignore
//! use fable_narrative::StoryOrchestrator;
//! use fable_models::OllamaDriver;
//!
//! # async fn example(params: fable_core::StoryParameters) -> fable_error::FableResult<()> {
//! let orchestrator = StoryOrchestrator::new(OllamaDriver::new()?);
//! let story = orchestrator.create_story(&params).await?;
//! println!("{}: {} pages", story.title(), story.pages().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod orchestrator;
mod pipeline;
pub mod prompts;
pub mod responses;
mod thread;
mod title_page;

pub use extraction::{extract_json, parse_json, parse_reply};
pub use orchestrator::StoryOrchestrator;
pub use pipeline::{PAGE_PIPELINE, PageStage};
pub use responses::StructuredReply;
pub use thread::ConversationThread;
pub use title_page::TITLE_PAGE_BACKGROUND;
