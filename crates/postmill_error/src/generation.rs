//! Content generation errors.
//!
//! Every variant here is a `GenerationFailure` from the engine's point of view:
//! the due item being processed is recorded as failed and the run continues.

/// Content generation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No API key was configured for the generation service
    #[display("Generation API key not configured")]
    MissingApiKey,

    /// Transport failure talking to the generation service
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// The generation service answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// The model returned no usable text
    #[display("Model returned empty output")]
    EmptyOutput,

    /// The response body could not be parsed
    #[display("Failed to parse response: {}", _0)]
    Parse(String),

    /// The fallback chain is empty
    #[display("No generation models configured")]
    NoModels,

    /// Every model in the fallback chain failed
    #[display("All models failed: {}", _0.join("; "))]
    AllModelsFailed(Vec<String>),
}

impl GenerationErrorKind {
    /// Whether retrying the same model may succeed.
    ///
    /// Rate limits and server-side errors are transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Content generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at {}:{}", kind, file, line)]
pub struct GenerationError {
    /// The specific error kind
    pub kind: GenerationErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Whether retrying the same model may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result type for content generation.
pub type GenerationResult<T> = Result<T, GenerationError>;
