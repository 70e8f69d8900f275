//! A single narrative unit and the render prompts derived from it.

use serde::{Deserialize, Serialize};

/// One page of a story.
///
/// Created with just its paragraph by the narrative exchange, then filled in
/// field by field as the per-page stages complete. Serialized with camelCase
/// keys for the downstream document and image collaborators.
///
/// # Examples
///
/// ```
/// use fable_core::StoryPage;
///
/// let mut page = StoryPage::new("Gavin pets a dog.");
/// page.set_background("a sunny backyard with a wooden fence");
/// page.set_render_prompt_secondary("a golden retriever, wagging its tail");
///
/// assert!(page.render_prompt_primary().is_none());
/// assert!(!page.uses_regions());
///
/// let json = serde_json::to_value(&page).unwrap();
/// assert_eq!(json["renderPromptSecondary"], "a golden retriever, wagging its tail");
/// assert!(json.get("renderPromptPrimary").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    /// The narrative text
    paragraph: String,
    /// Render prompt for the protagonist, when they appear on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render_prompt_primary: Option<String>,
    /// Render prompt for the other character chosen for the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render_prompt_secondary: Option<String>,
    /// Scene description
    background: String,
}

impl StoryPage {
    /// Start a page from its narrative text.
    pub fn new(paragraph: impl Into<String>) -> Self {
        Self {
            paragraph: paragraph.into(),
            render_prompt_primary: None,
            render_prompt_secondary: None,
            background: String::new(),
        }
    }

    /// Set the protagonist render prompt.
    pub fn set_render_prompt_primary(&mut self, prompt: impl Into<String>) {
        self.render_prompt_primary = Some(prompt.into());
    }

    /// Set the other-character render prompt.
    pub fn set_render_prompt_secondary(&mut self, prompt: impl Into<String>) {
        self.render_prompt_secondary = Some(prompt.into());
    }

    /// Set the scene description.
    pub fn set_background(&mut self, background: impl Into<String>) {
        self.background = background.into();
    }

    /// Whether the page needs two composited regions (protagonist and other
    /// character) when rendered.
    pub fn uses_regions(&self) -> bool {
        self.render_prompt_primary.is_some() && self.render_prompt_secondary.is_some()
    }
}
