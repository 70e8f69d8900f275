//! Text-generation transport errors.

/// Specific transport failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExchangeErrorKind {
    /// Text-generation server not reachable at the given address
    #[display("Server not running at {}", _0)]
    ServerNotRunning(String),
    /// Requested model is not available on the server
    #[display("Model not found: {}", _0)]
    ModelNotFound(String),
    /// Server answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Request did not complete within the configured timeout
    #[display("Request timed out after {}s", _0)]
    Timeout(u64),
    /// Server answered but the envelope could not be decoded
    #[display("Invalid response envelope: {}", _0)]
    InvalidResponse(String),
    /// Invalid transport configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfiguration(String),
    /// Any other request failure
    #[display("Request failed: {}", _0)]
    Request(String),
}

impl ExchangeErrorKind {
    /// Check if this error type should be retried.
    ///
    /// An exchange that failed this way never reached the conversation, so
    /// re-issuing it with the same context is safe.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExchangeErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ExchangeErrorKind::ServerNotRunning(_) => true,
            ExchangeErrorKind::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Transport failure with location tracking.
///
/// # Examples
///
/// ```
/// use fable_error::{ExchangeError, ExchangeErrorKind};
///
/// let err = ExchangeError::new(ExchangeErrorKind::Http {
///     status_code: 503,
///     message: "busy".to_string(),
/// });
/// assert!(err.kind.is_retryable());
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Exchange Error: {} at line {} in {}", kind, line, file)]
pub struct ExchangeError {
    /// The specific error condition
    pub kind: ExchangeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExchangeError {
    /// Create a new ExchangeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExchangeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Check if this error should be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status_code in [408, 429, 500, 502, 503, 504] {
            let kind = ExchangeErrorKind::Http {
                status_code,
                message: String::new(),
            };
            assert!(kind.is_retryable(), "{} should be retryable", status_code);
        }

        let not_found = ExchangeErrorKind::Http {
            status_code: 404,
            message: String::new(),
        };
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_configuration_errors_are_permanent() {
        assert!(!ExchangeErrorKind::ModelNotFound("mistral".to_string()).is_retryable());
        assert!(!ExchangeErrorKind::InvalidConfiguration("bad url".to_string()).is_retryable());
        assert!(ExchangeErrorKind::Timeout(30).is_retryable());
    }
}
