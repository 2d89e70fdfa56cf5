//! Configuration error types.

use std::fmt;

/// Configuration that could not be loaded or failed validation.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Table of `masal.toml` at fault, if known
    pub section: Option<&'static str>,
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// A configuration error not tied to one table.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_error::ConfigError;
    ///
    /// let err = ConfigError::new("masal.toml: expected a table");
    /// assert!(err.section.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(None, message.into())
    }

    /// A configuration error in one table of `masal.toml`.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_error::ConfigError;
    ///
    /// let err = ConfigError::in_section("quota", "limit must be at least 1");
    /// assert!(err.to_string().starts_with("Configuration Error in [quota]"));
    /// ```
    #[track_caller]
    pub fn in_section(section: &'static str, message: impl Into<String>) -> Self {
        Self::located(Some(section), message.into())
    }

    #[track_caller]
    fn located(section: Option<&'static str>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            section,
            message,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.section {
            Some(section) => write!(f, "Configuration Error in [{}]: ", section)?,
            None => write!(f, "Configuration Error: ")?,
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}
