//! Errors from assembling a value through its builder.

/// What was wrong with the builder's fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required setter was never called
    #[display("missing required field '{}'", _0)]
    MissingField(&'static str),

    /// Fields were set but failed validation
    #[display("{}", _0)]
    Invalid(String),
}

/// A builder refused to produce its value.
///
/// # Examples
///
/// ```
/// use masal_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::missing("UserInput", "theme");
/// assert_eq!(err.target(), "UserInput");
/// assert_eq!(err.kind(), &BuilderErrorKind::MissingField("theme"));
/// assert!(err.to_string().contains("Cannot build UserInput: missing required field 'theme'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cannot build {}: {} at line {} in {}", target, kind, line, file)]
pub struct BuilderError {
    target: &'static str,
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Record a failure to build `target`, at the caller's location.
    #[track_caller]
    pub fn new(target: &'static str, kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            target,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A required field of `target` was not set.
    #[track_caller]
    pub fn missing(target: &'static str, field: &'static str) -> Self {
        Self::new(target, BuilderErrorKind::MissingField(field))
    }

    /// The fields of `target` failed validation.
    #[track_caller]
    pub fn invalid(target: &'static str, reason: impl Into<String>) -> Self {
        Self::new(target, BuilderErrorKind::Invalid(reason.into()))
    }

    /// Name of the type that could not be built.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// What went wrong.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}
