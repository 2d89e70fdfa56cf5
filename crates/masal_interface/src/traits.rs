//! Trait definitions for generation backends.

use async_trait::async_trait;
use masal_core::{AudioPayload, ImageRef, StoryData, UserInput};
use masal_error::MasalResult;

/// Writes the story text for a request.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    /// Produce the title, summary, cover prompt and pages for `input`.
    ///
    /// Returned pages carry no assets yet.
    ///
    /// # Errors
    ///
    /// Fails if the backend is unreachable or its response is empty or malformed.
    async fn write_story(&self, input: &UserInput) -> MasalResult<StoryData>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// Draws illustrations from English prompts.
#[async_trait]
pub trait Illustrator: Send + Sync {
    /// Generate an image for `prompt`.
    ///
    /// # Errors
    ///
    /// Fails if the backend is unreachable or returns no image data.
    async fn illustrate(&self, prompt: &str) -> MasalResult<ImageRef>;

    /// Generate an image, falling back to a placeholder on any failure.
    async fn illustrate_or_placeholder(&self, prompt: &str) -> ImageRef {
        match self.illustrate(prompt).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(error = %e, "Illustration failed, using placeholder");
                ImageRef::placeholder()
            }
        }
    }
}

/// Reads text aloud.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Synthesize speech for `text`.
    ///
    /// # Errors
    ///
    /// Fails if the backend is unreachable or returns no audio data.
    async fn narrate(&self, text: &str) -> MasalResult<AudioPayload>;

    /// Synthesize speech, yielding `None` on any failure.
    async fn narrate_or_silence(&self, text: &str) -> Option<AudioPayload> {
        match self.narrate(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(error = %e, "Narration failed, page will be silent");
                None
            }
        }
    }
}
