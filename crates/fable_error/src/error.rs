//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ExchangeError, JsonError, StorageError, StoryError,
    StructuredResponseError,
};

/// Every error condition a Fable operation can produce.
///
/// # Examples
///
/// ```
/// use fable_error::{ConfigError, FableError, FableErrorKind};
///
/// let err: FableError = ConfigError::new("Missing model").into();
/// assert!(matches!(err.kind(), FableErrorKind::Config(_)));
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FableErrorKind {
    /// Text-generation transport failure
    #[from(ExchangeError)]
    Exchange(ExchangeError),
    /// Reply did not contain the expected structured data
    #[from(StructuredResponseError)]
    StructuredResponse(StructuredResponseError),
    /// Story orchestration invariant violated
    #[from(StoryError)]
    Story(StoryError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Output persistence error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Fable error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fable_error::{ExchangeStep, FableResult, StructuredResponseError, StructuredResponseErrorKind};
///
/// fn parse_title() -> FableResult<String> {
///     Err(StructuredResponseError::new(
///         ExchangeStep::Title,
///         StructuredResponseErrorKind::NoJson,
///         "A fine title",
///     ))?
/// }
///
/// let err = parse_title().unwrap_err();
/// assert!(err.is_malformed_response());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fable Error: {}", _0)]
pub struct FableError(Box<FableErrorKind>);

impl FableError {
    /// Create a new error from a kind.
    pub fn new(kind: FableErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FableErrorKind {
        &self.0
    }

    /// Whether the text-generation service itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), FableErrorKind::Exchange(_))
    }

    /// Whether the service replied without the expected structured fields.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self.kind(), FableErrorKind::StructuredResponse(_))
    }

    /// The transport failure, if this is one.
    pub fn as_exchange(&self) -> Option<&ExchangeError> {
        match self.kind() {
            FableErrorKind::Exchange(err) => Some(err),
            _ => None,
        }
    }

    /// The malformed response details, if this is one.
    pub fn as_structured_response(&self) -> Option<&StructuredResponseError> {
        match self.kind() {
            FableErrorKind::StructuredResponse(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FableErrorKind
impl<T> From<T> for FableError
where
    T: Into<FableErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fable operations.
///
/// # Examples
///
/// ```
/// use fable_error::{ConfigError, FableResult};
///
/// fn load() -> FableResult<String> {
///     Err(ConfigError::new("fable.toml not found"))?
/// }
/// ```
pub type FableResult<T> = std::result::Result<T, FableError>;
