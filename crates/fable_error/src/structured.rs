//! Malformed structured response errors.

/// The exchange in the story run that produced a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
pub enum ExchangeStep {
    /// Generating the page paragraphs
    #[display("narrative")]
    Narrative,
    /// Naming the story
    #[display("title")]
    Title,
    /// Listing the characters that matter
    #[display("character names")]
    CharacterNames,
    /// Detecting who is visible on a page
    #[display("visible characters (page {})", _0)]
    VisibleCharacters(usize),
    /// Describing a newly seen character
    #[display("character description (page {})", _0)]
    CharacterDescription(usize),
    /// Describing how the chosen character reacts to a page
    #[display("character reaction (page {})", _0)]
    CharacterReaction(usize),
    /// Describing the scenery of a page
    #[display("background (page {})", _0)]
    Background(usize),
    /// Describing how the protagonist reacts to a page
    #[display("protagonist reaction (page {})", _0)]
    ProtagonistReaction(usize),
    /// Describing the protagonist on the cover
    #[display("cover protagonist")]
    CoverProtagonist,
    /// Describing the supporting character on the cover
    #[display("cover supporting character")]
    CoverSupporting,
}

/// Why a reply could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StructuredResponseErrorKind {
    /// No JSON object or array could be located in the reply
    #[display("No JSON found in reply")]
    NoJson,
    /// JSON was found but did not match the expected shape
    #[display("Unexpected JSON shape: {}", _0)]
    Shape(String),
    /// A required field held an empty value
    #[display("Field '{}' is empty", _0)]
    EmptyField(String),
    /// The reply held a different number of items than requested
    #[display("Expected {} items, got {}", expected, actual)]
    UnexpectedLength {
        /// Number of items requested
        expected: usize,
        /// Number of items received
        actual: usize,
    },
}

/// The service replied, but not with the structured data a step needed.
///
/// Carries the step and the full raw reply so a caller can decide whether to
/// retry that exchange or abort the run.
///
/// # Examples
///
/// ```
/// use fable_error::{ExchangeStep, StructuredResponseError, StructuredResponseErrorKind};
///
/// let err = StructuredResponseError::new(
///     ExchangeStep::Narrative,
///     StructuredResponseErrorKind::Shape("story: invalid type".to_string()),
///     r#"{"story": "not-an-array"}"#,
/// );
/// assert_eq!(err.step, ExchangeStep::Narrative);
/// assert!(err.raw.contains("not-an-array"));
/// assert!(format!("{}", err).contains("narrative"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Malformed structured response for {} step: {} (reply: {}) at line {} in {}",
    step,
    kind,
    preview(raw),
    line,
    file
)]
pub struct StructuredResponseError {
    /// Exchange that produced the reply
    pub step: ExchangeStep,
    /// Why the reply could not be interpreted
    pub kind: StructuredResponseErrorKind,
    /// The reply text exactly as received
    pub raw: String,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StructuredResponseError {
    /// Create a new StructuredResponseError with automatic location tracking.
    #[track_caller]
    pub fn new(
        step: ExchangeStep,
        kind: StructuredResponseErrorKind,
        raw: impl Into<String>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            step,
            kind,
            raw: raw.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

fn preview(raw: &str) -> String {
    const LIMIT: usize = 100;
    if raw.chars().count() <= LIMIT {
        raw.to_string()
    } else {
        format!("{}...", raw.chars().take(LIMIT).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_truncates_long_replies() {
        let raw = "x".repeat(500);
        let err = StructuredResponseError::new(
            ExchangeStep::Background(2),
            StructuredResponseErrorKind::NoJson,
            raw.clone(),
        );
        let message = err.to_string();
        assert!(message.contains("background (page 2)"));
        assert!(message.len() < raw.len());
        assert_eq!(err.raw.len(), 500);
    }
}
