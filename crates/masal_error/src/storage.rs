//! Errors from the local key-value store.

/// What the store failed to do. The payload names the path or key involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Reading the backing file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Writing or replacing the backing file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Creating the parent directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// The file exists but does not hold a JSON object of strings
    #[display("Corrupt storage file: {}", _0)]
    Corrupt(String),
    /// A writer panicked while holding the store's lock
    #[display("Storage lock poisoned: {}", _0)]
    LockPoisoned(String),
}

/// A store operation failed.
///
/// ```
/// use masal_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Corrupt("quota.json: expected an object".into()));
/// assert!(err.to_string().starts_with("Storage Error: Corrupt storage file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// What went wrong
    pub kind: StorageErrorKind,
    /// Line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl StorageError {
    /// Capture `kind` at the caller's location.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            kind,
            line: caller.line(),
            file: caller.file(),
        }
    }
}
