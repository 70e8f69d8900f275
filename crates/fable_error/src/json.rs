//! JSON error types.

/// JSON serialization error with source location.
///
/// Raised when a finished story cannot be rendered to `story.json` or
/// `metadata.json`. Replies from the text-generation service that fail to
/// parse are a [`StructuredResponseError`](crate::StructuredResponseError)
/// instead.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fable_error::JsonError;
    ///
    /// let err = JsonError::new("Failed to serialize story: key must be a string");
    /// assert!(err.message.contains("serialize story"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
