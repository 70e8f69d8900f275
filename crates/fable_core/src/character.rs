//! Character profiles supplied by the caller.

use fable_error::BuilderError;
use serde::{Deserialize, Serialize};

/// A trained character identity the image backend can be pointed at.
///
/// Rendered as `<lora:NAME:WEIGHT>` at the front of a render prompt.
///
/// # Examples
///
/// ```
/// use fable_core::IdentityReference;
///
/// assert_eq!(IdentityReference::new("gavin-15").to_string(), "<lora:gavin-15:1>");
/// assert_eq!(
///     IdentityReference::with_weight("mia-v2", 0.8).to_string(),
///     "<lora:mia-v2:0.8>"
/// );
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_more::Display,
)]
#[display("<lora:{}:{}>", name, weight)]
pub struct IdentityReference {
    /// Identity model name
    name: String,
    /// Blend weight
    #[serde(default = "default_weight")]
    weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl IdentityReference {
    /// Reference an identity at full weight.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_weight(name, default_weight())
    }

    /// Reference an identity at a specific weight.
    pub fn with_weight(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// A named character the caller wants in the story.
///
/// The `description` is narrative ("a boy toddler") and goes into story
/// prompts. The `render_tags` are tag-style ("toddler, curly") and go into
/// render prompts, prefixed by `gender` when one is given.
///
/// # Examples
///
/// ```
/// use fable_core::{CharacterProfile, IdentityReference};
///
/// let gavin = CharacterProfile::builder()
///     .name("Gavin")
///     .description("a boy toddler")
///     .render_tags("toddler")
///     .gender("male")
///     .identity(IdentityReference::new("gavin-15"))
///     .build()
///     .unwrap();
///
/// assert_eq!(gavin.tag_line(), "male, toddler");
/// assert_eq!(
///     gavin.render_prompt("grinning at the puppy"),
///     "<lora:gavin-15:1>male, toddler, grinning at the puppy"
/// );
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
pub struct CharacterProfile {
    /// Display name, as it should appear in the story
    name: String,
    /// Narrative description used in story prompts
    #[builder(default)]
    #[serde(default)]
    description: String,
    /// Tag-style physical description used in render prompts
    #[builder(default)]
    #[serde(default)]
    render_tags: String,
    /// Gender tag prefixed to the render tags
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    gender: Option<String>,
    /// Identity reference for the image backend
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    identity: Option<IdentityReference>,
}

impl CharacterProfileBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("character name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl CharacterProfile {
    /// Creates a new character profile builder.
    pub fn builder() -> CharacterProfileBuilder {
        CharacterProfileBuilder::default()
    }

    /// Render tags with the gender prefix applied.
    pub fn tag_line(&self) -> String {
        match self.gender.as_deref().map(str::trim) {
            Some(gender) if !gender.is_empty() => {
                if self.render_tags.trim().is_empty() {
                    gender.to_string()
                } else {
                    format!("{}, {}", gender, self.render_tags)
                }
            }
            _ => self.render_tags.clone(),
        }
    }

    /// Identity reference followed by the tag line.
    ///
    /// This is also the registry description of a supporting character, which
    /// comes from the caller rather than from the story.
    pub fn render_prefix(&self) -> String {
        match &self.identity {
            Some(identity) => format!("{}{}", identity, self.tag_line()),
            None => self.tag_line(),
        }
    }

    /// Full render prompt for a narrative-derived description.
    ///
    /// A profile with no identity, gender or tags yields the description alone.
    pub fn render_prompt(&self, description: &str) -> String {
        let prefix = self.render_prefix();
        if prefix.trim().is_empty() {
            description.to_string()
        } else {
            format!("{}, {}", prefix, description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let result = CharacterProfile::builder().name("   ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_name_rejected() {
        let result = CharacterProfile::builder().render_tags("toddler").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_render_prefix_without_identity_or_gender() {
        let dog = CharacterProfile::builder()
            .name("Rex")
            .render_tags("dog, brown")
            .build()
            .unwrap();
        assert_eq!(dog.render_prefix(), "dog, brown");
        assert_eq!(dog.render_prompt("sniffing"), "dog, brown, sniffing");
    }

    #[test]
    fn test_bare_profile_renders_description_alone() {
        let owl = CharacterProfile::builder().name("Owl").build().unwrap();
        assert_eq!(owl.render_prefix(), "");
        assert_eq!(owl.render_prompt("hooting softly"), "hooting softly");
    }

    #[test]
    fn test_blank_gender_ignored() {
        let mia = CharacterProfile::builder()
            .name("Mia")
            .render_tags("adult")
            .gender("  ")
            .identity(IdentityReference::new("mia-v2"))
            .build()
            .unwrap();
        assert_eq!(mia.render_prefix(), "<lora:mia-v2:1>adult");
    }
}
