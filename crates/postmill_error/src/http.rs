//! Transport failures outside of publishing and generation.

/// Socket or client failure: binding the listener, or reaching the Graph
/// API while validating a token.
///
/// Publisher and model transport failures are reported through their own
/// error kinds so they can be isolated per platform and per model.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// Transport error text
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl HttpError {
    /// Capture a transport failure at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
