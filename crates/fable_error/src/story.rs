//! Story orchestration error types.

/// Specific error conditions for story orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryErrorKind {
    /// A character was chosen for a page before a description was registered
    #[display("Character '{}' has no registered description", _0)]
    UnregisteredCharacter(String),
    /// The supporting character is configured but absent from the registry
    #[display("Supporting character '{}' missing from registry", _0)]
    MissingSupportingCharacter(String),
}

/// Error type for story orchestration.
///
/// # Examples
///
/// ```
/// use fable_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::UnregisteredCharacter("Dog".to_string()));
/// assert!(format!("{}", err).contains("Dog"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
