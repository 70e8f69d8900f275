//! The artifact a story run produces.

use crate::{CharacterRegistry, ConversationContext, StoryPage};
use serde::{Deserialize, Serialize};

/// Pages, title, registry, and final context of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorySet {
    /// Pages in narrative order
    pages: Vec<StoryPage>,
    /// Story title
    title: String,
    /// Every character description discovered or seeded during the run
    characters: CharacterRegistry,
    /// Context after the last exchange
    context: ConversationContext,
}

impl StorySet {
    /// Assemble a finished story.
    pub fn new(
        pages: Vec<StoryPage>,
        title: impl Into<String>,
        characters: CharacterRegistry,
        context: ConversationContext,
    ) -> Self {
        Self {
            pages,
            title: title.into(),
            characters,
            context,
        }
    }
}
