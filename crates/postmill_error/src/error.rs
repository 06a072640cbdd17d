//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, HttpError, InvalidRequestError, NotFoundError, PublishError,
};

/// Foundation error enum covering every failure the workspace surfaces.
///
/// # Examples
///
/// ```
/// use postmill_error::{PostmillError, InvalidRequestError};
///
/// let err: PostmillError = InvalidRequestError::new("Invalid action").into();
/// assert!(format!("{}", err).contains("Invalid Request"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PostmillErrorKind {
    /// Content generation failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Publishing to a platform failed
    #[from(PublishError)]
    Publish(PublishError),
    /// Referenced entity does not exist
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Malformed request
    #[from(InvalidRequestError)]
    InvalidRequest(InvalidRequestError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
}

/// Postmill error with kind discrimination.
///
/// # Examples
///
/// ```
/// use postmill_error::{PostmillErrorKind, PostmillResult, NotFoundError};
///
/// fn might_fail() -> PostmillResult<()> {
///     Err(NotFoundError::new("schedule", "42"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), PostmillErrorKind::NotFound(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Postmill Error: {}", _0)]
pub struct PostmillError(Box<PostmillErrorKind>);

impl PostmillError {
    /// Create a new error from a kind.
    pub fn new(kind: PostmillErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PostmillErrorKind {
        &self.0
    }

    /// Message without the source location, for API responses and run reports.
    pub fn message(&self) -> String {
        match self.kind() {
            PostmillErrorKind::Generation(e) => e.kind.to_string(),
            PostmillErrorKind::Publish(e) => e.kind.to_string(),
            PostmillErrorKind::NotFound(e) => format!("{} '{}' not found", e.entity, e.id),
            PostmillErrorKind::InvalidRequest(e) => e.message.clone(),
            PostmillErrorKind::Config(e) => e.message.clone(),
            PostmillErrorKind::Http(e) => e.message.clone(),
        }
    }
}

// Generic From implementation for any type that converts to PostmillErrorKind
impl<T> From<T> for PostmillError
where
    T: Into<PostmillErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Postmill operations.
pub type PostmillResult<T> = std::result::Result<T, PostmillError>;
