//! Story output persistence errors.

/// Kinds of persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the story output directory
    #[display("Failed to create output directory {}: {}", path, message)]
    DirectoryCreation {
        /// Directory that could not be created
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// Failed to write an output file
    #[display("Failed to write {}: {}", path, message)]
    FileWrite {
        /// File that could not be written
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// Output directory already holds a story
    #[display("Output directory already exists: {}", _0)]
    AlreadyExists(String),
}

/// Persistence error with location tracking.
///
/// # Examples
///
/// ```
/// use fable_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileWrite {
///     path: "stories/1700000000/story.json".to_string(),
///     message: "disk full".to_string(),
/// });
/// assert!(format!("{}", err).contains("story.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
