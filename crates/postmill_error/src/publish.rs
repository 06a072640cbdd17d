//! Platform publishing errors.

/// Platform publishing error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorKind {
    /// Generic publish failure reported by the platform or transport
    #[display("Publish failed: {}", _0)]
    Failed(String),

    /// The credential lacks required scopes
    #[display("Permission denied: {}", _0)]
    Permission(String),

    /// The credential has expired
    #[display("Token expired: {}", _0)]
    TokenExpired(String),

    /// Credentials for the platform are not configured
    #[display("Missing credentials: {}", _0)]
    MissingCredentials(String),

    /// Content is not acceptable for the platform (empty text, missing image)
    #[display("Validation failed: {}", _0)]
    Validation(String),

    /// No publisher is registered for the platform
    #[display("Unsupported platform: {}", _0)]
    Unsupported(String),
}

impl PublishErrorKind {
    /// Machine-readable category exposed in run outcomes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Failed(_) => "publish",
            Self::Permission(_) => "permission",
            Self::TokenExpired(_) => "token_expired",
            Self::MissingCredentials(_) => "credentials",
            Self::Validation(_) => "validation",
            Self::Unsupported(_) => "unsupported",
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Failed(m)
            | Self::Permission(m)
            | Self::TokenExpired(m)
            | Self::MissingCredentials(m)
            | Self::Validation(m)
            | Self::Unsupported(m) => m,
        }
    }
}

/// Platform publishing error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at {}:{}", kind, file, line)]
pub struct PublishError {
    /// The specific error kind
    pub kind: PublishErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Machine-readable category of this error.
    pub fn category(&self) -> &'static str {
        self.kind.category()
    }
}

/// Result type for publishing operations.
pub type PublishResult<T> = Result<T, PublishError>;
