//! Lookup failures for stored entities.

/// An operation referenced an identifier that does not exist.
///
/// No state is mutated when this error is returned.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} '{}' at line {} in {}", entity, id, line, file)]
pub struct NotFoundError {
    /// Kind of entity that was looked up (e.g. "schedule", "post")
    pub entity: &'static str,
    /// Identifier that was not found
    pub id: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError for the given entity kind and id.
    ///
    /// # Examples
    ///
    /// ```
    /// use postmill_error::NotFoundError;
    ///
    /// let err = NotFoundError::new("post", "post_123");
    /// assert_eq!(err.id, "post_123");
    /// assert!(err.to_string().contains("post"));
    /// ```
    #[track_caller]
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            entity,
            id: id.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
