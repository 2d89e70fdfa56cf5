//! Generation pipeline error types.

/// Fatal conditions raised while producing a story.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Story text generation returned nothing usable
    #[display("Story generation failed: {}", _0)]
    GenerationFailed(String),
    /// Generated story has no pages
    #[display("Generated story contains no pages")]
    EmptyStory,
    /// Generated page numbering is unusable
    #[display("Invalid page number {} in generated story", _0)]
    InvalidPageNumber(u32),
    /// Generated page has no text
    #[display("Page {} has no text", _0)]
    EmptyPage(u32),
    /// An illustration request produced no image data
    #[display("No image data in response: {}", _0)]
    MissingImage(String),
    /// A speech request produced no audio data
    #[display("No audio data in response: {}", _0)]
    MissingAudio(String),
    /// Generated media could not be decoded
    #[display("Invalid media payload: {}", _0)]
    InvalidMedia(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use masal_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::EmptyStory);
/// assert!(format!("{}", err).contains("no pages"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The kind of error that occurred
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
