//! JSON error types.

/// A document that could not be encoded to or decoded from JSON.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error in {}: {} at line {} in {}", document, message, line, file)]
pub struct JsonError {
    /// What was being encoded or decoded (e.g. "quota record")
    pub document: &'static str,
    /// The serializer's message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record a JSON failure for `document` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_error::JsonError;
    ///
    /// let err = JsonError::new("story document", "key must be a string");
    /// assert!(err.to_string().starts_with("JSON Error in story document"));
    /// ```
    #[track_caller]
    pub fn new(document: &'static str, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            document,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
