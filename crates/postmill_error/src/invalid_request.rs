//! Malformed control requests.

/// A request to the engine was malformed (unknown action, missing field).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invalid Request: {} at line {} in {}", message, line, file)]
pub struct InvalidRequestError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvalidRequestError {
    /// Create a new InvalidRequestError with the given message at the current location.
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
