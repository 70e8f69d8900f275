//! Validated inputs for a story run.

use crate::CharacterProfile;
use fable_error::BuilderError;
use serde::{Deserialize, Serialize};

/// Default story genre.
pub const DEFAULT_GENRE: &str = "children's story";
/// Default number of pages.
pub const DEFAULT_PAGE_COUNT: usize = 5;
/// Default text-generation model.
pub const DEFAULT_MODEL: &str = "mistral";

/// What story to tell, about whom, and with which model.
///
/// # Examples
///
/// ```
/// use fable_core::{CharacterProfile, StoryParameters};
///
/// let params = StoryParameters::builder()
///     .protagonist(CharacterProfile::builder().name("Gavin").build().unwrap())
///     .page_count(3usize)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.genre(), "children's story");
/// assert_eq!(params.model(), "mistral");
/// assert_eq!(*params.page_count(), 3);
/// assert!(params.supporting().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(validate = "Self::validate", error = "BuilderError"))]
pub struct StoryParameters {
    /// Story genre, e.g. "children's story"
    #[builder(default = "DEFAULT_GENRE.to_string()")]
    genre: String,
    /// Optional plot outline
    #[builder(default, setter(into, strip_option))]
    plot: Option<String>,
    /// Number of pages to generate
    #[builder(default = "DEFAULT_PAGE_COUNT")]
    page_count: usize,
    /// Text-generation model identifier
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// Main character
    protagonist: CharacterProfile,
    /// Optional second named character
    #[builder(default, setter(into, strip_option))]
    supporting: Option<CharacterProfile>,
}

impl StoryParametersBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.page_count {
            return Err("page_count must be at least 1".to_string());
        }
        if let Some(model) = &self.model
            && model.trim().is_empty()
        {
            return Err("model cannot be empty".to_string());
        }
        if let (Some(protagonist), Some(Some(supporting))) = (&self.protagonist, &self.supporting)
            && protagonist.name() == supporting.name()
        {
            return Err(format!(
                "supporting character cannot share the protagonist's name '{}'",
                protagonist.name()
            ));
        }
        Ok(())
    }
}

impl StoryParameters {
    /// Creates a new parameters builder.
    pub fn builder() -> StoryParametersBuilder {
        StoryParametersBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> CharacterProfile {
        CharacterProfile::builder().name(name).build().unwrap()
    }

    #[test]
    fn test_zero_pages_rejected() {
        let result = StoryParameters::builder()
            .protagonist(profile("Gavin"))
            .page_count(0usize)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_protagonist_rejected() {
        let result = StoryParameters::builder().genre("fable").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_supporting_must_differ_from_protagonist() {
        let result = StoryParameters::builder()
            .protagonist(profile("Gavin"))
            .supporting(profile("Gavin"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let params = StoryParameters::builder()
            .protagonist(profile("Gavin"))
            .supporting(profile("Mia"))
            .genre("bedtime story")
            .plot("they build a treehouse")
            .model("llama3")
            .build()
            .unwrap();
        assert_eq!(params.genre(), "bedtime story");
        assert_eq!(params.plot().as_deref(), Some("they build a treehouse"));
        assert_eq!(params.model(), "llama3");
        assert_eq!(*params.page_count(), DEFAULT_PAGE_COUNT);
        assert_eq!(params.supporting().as_ref().map(|c| c.name().as_str()), Some("Mia"));
    }
}
