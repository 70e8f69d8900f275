//! Typed shapes of the structured replies each exchange expects.

use fable_error::{ExchangeStep, StructuredResponseError, StructuredResponseErrorKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// A reply a conversation step can ask for.
///
/// Parsing only proves the shape; `empty_field` names a required text field
/// that came back blank, which is just as unusable downstream.
pub trait StructuredReply: DeserializeOwned {
    /// The first required field holding only whitespace, if any.
    fn empty_field(&self) -> Option<&'static str> {
        None
    }
}

fn blank(text: &str, field: &'static str) -> Option<&'static str> {
    text.trim().is_empty().then_some(field)
}

/// One element of the narrative array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageReply {
    /// The page text
    pub paragraph: String,
}

/// Reply to the narrative prompt: `{"story": [{"paragraph": ...}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoryReply {
    /// Pages in order
    pub story: Vec<PageReply>,
}

impl StoryReply {
    /// Check the page count and that no paragraph is blank.
    pub fn validate(&self, expected: usize, raw: &str) -> Result<(), StructuredResponseError> {
        if self.story.len() != expected {
            return Err(StructuredResponseError::new(
                ExchangeStep::Narrative,
                StructuredResponseErrorKind::UnexpectedLength {
                    expected,
                    actual: self.story.len(),
                },
                raw,
            ));
        }
        if let Some(index) = self
            .story
            .iter()
            .position(|page| page.paragraph.trim().is_empty())
        {
            return Err(StructuredResponseError::new(
                ExchangeStep::Narrative,
                StructuredResponseErrorKind::EmptyField(format!("story[{}].paragraph", index)),
                raw,
            ));
        }
        Ok(())
    }
}

/// Reply to the title prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TitleReply {
    /// Story title
    #[serde(deserialize_with = "flexible_text")]
    pub story_name: String,
}

impl StructuredReply for TitleReply {
    fn empty_field(&self) -> Option<&'static str> {
        blank(&self.story_name, "story_name")
    }
}

/// Reply to the character-names prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamesReply {
    /// Names to detect characters by
    pub names: Vec<String>,
}

impl StructuredReply for NamesReply {}

/// Reply to the per-page detection prompt.
///
/// Either list may be missing or null, and entries may be null; those all
/// read as "nobody".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VisibleCharactersReply {
    #[serde(default)]
    people: Option<Vec<Option<String>>>,
    #[serde(default)]
    animals: Option<Vec<Option<String>>>,
}

impl VisibleCharactersReply {
    /// Non-empty people names, in reply order.
    pub fn people(&self) -> Vec<String> {
        present(&self.people)
    }

    /// Non-empty animal names, in reply order.
    pub fn animals(&self) -> Vec<String> {
        present(&self.animals)
    }
}

impl StructuredReply for VisibleCharactersReply {}

fn present(names: &Option<Vec<Option<String>>>) -> Vec<String> {
    names
        .iter()
        .flatten()
        .flatten()
        .filter(|name| !name.is_empty())
        .cloned()
        .collect()
}

/// Reply to the description and reaction prompts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DescriptionReply {
    /// One-sentence description
    #[serde(deserialize_with = "flexible_text")]
    pub description: String,
}

impl StructuredReply for DescriptionReply {
    fn empty_field(&self) -> Option<&'static str> {
        blank(&self.description, "description")
    }
}

/// Reply to the scene prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackgroundReply {
    /// Scene description
    #[serde(deserialize_with = "flexible_text")]
    pub background: String,
}

impl StructuredReply for BackgroundReply {
    fn empty_field(&self) -> Option<&'static str> {
        blank(&self.background, "background")
    }
}

/// Accepts a string, or an array of strings joined with commas.
///
/// Models sometimes return a list despite being asked not to.
fn flexible_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::One(text) => text,
        Text::Many(parts) => parts.join(","),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_characters_tolerates_gaps() {
        let reply: VisibleCharactersReply =
            serde_json::from_str(r#"{"people": ["Gavin", null, ""]}"#).unwrap();
        assert_eq!(reply.people(), vec!["Gavin"]);
        assert!(reply.animals().is_empty());

        let reply: VisibleCharactersReply =
            serde_json::from_str(r#"{"people": null, "animals": ["Dog"]}"#).unwrap();
        assert!(reply.people().is_empty());
        assert_eq!(reply.animals(), vec!["Dog"]);
    }

    #[test]
    fn test_description_accepts_list() {
        let reply: DescriptionReply =
            serde_json::from_str(r#"{"description": ["a tall man", " smiling"]}"#).unwrap();
        assert_eq!(reply.description, "a tall man, smiling");
    }

    #[test]
    fn test_description_rejects_number() {
        let result = serde_json::from_str::<DescriptionReply>(r#"{"description": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_text_fields_reported() {
        let reply: BackgroundReply = serde_json::from_str(r#"{"background": "  "}"#).unwrap();
        assert_eq!(reply.empty_field(), Some("background"));

        let reply: DescriptionReply = serde_json::from_str(r#"{"description": [""]}"#).unwrap();
        assert_eq!(reply.empty_field(), Some("description"));

        let reply: TitleReply = serde_json::from_str(r#"{"story_name": ""}"#).unwrap();
        assert_eq!(reply.empty_field(), Some("story_name"));

        let reply: TitleReply = serde_json::from_str(r#"{"story_name": "Nap Time"}"#).unwrap();
        assert!(reply.empty_field().is_none());
    }

    #[test]
    fn test_story_validation() {
        let reply: StoryReply =
            serde_json::from_str(r#"{"story": [{"paragraph": "One"}, {"paragraph": " "}]}"#)
                .unwrap();

        let err = reply.validate(3, "raw").unwrap_err();
        assert_eq!(
            err.kind,
            StructuredResponseErrorKind::UnexpectedLength {
                expected: 3,
                actual: 2
            }
        );

        let err = reply.validate(2, "raw").unwrap_err();
        assert_eq!(
            err.kind,
            StructuredResponseErrorKind::EmptyField("story[1].paragraph".to_string())
        );
    }
}
