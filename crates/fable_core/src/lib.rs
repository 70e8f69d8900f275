//! Core data types for the Fable story orchestration library.
//!
//! This crate provides the data model shared by the orchestrator, the
//! text-generation transports, and the output writers:
//!
//! - [`StoryParameters`] and [`CharacterProfile`]: what story to tell
//! - [`StoryPage`], [`CharacterRegistry`], [`StorySet`]: what a run produces
//! - [`ConversationContext`], [`ExchangeRequest`], [`ExchangeResponse`]: what
//!   travels over the transport boundary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod context;
mod page;
mod parameters;
mod registry;
mod request;
mod story;

pub use character::{CharacterProfile, CharacterProfileBuilder, IdentityReference};
pub use context::ConversationContext;
pub use page::StoryPage;
pub use parameters::{StoryParameters, StoryParametersBuilder};
pub use registry::{CharacterRegistry, Registration};
pub use request::{ExchangeRequest, ExchangeResponse, ResponseFormat};
pub use story::StorySet;
