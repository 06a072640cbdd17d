//! Configuration failures.

/// Configuration could not be loaded, or it describes an engine that cannot
/// be built (for example an invalid seeded schedule).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What was wrong with the configuration
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl ConfigError {
    /// Capture a configuration failure at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use postmill_error::ConfigError;
    ///
    /// let err = ConfigError::new("Invalid [[schedules]] entry: no platforms");
    /// assert!(err.to_string().starts_with("Configuration Error: Invalid"));
    /// ```
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
