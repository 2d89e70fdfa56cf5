//! Google Gemini REST backend.

mod client;
mod dto;

pub use client::GeminiClient;
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GenerationConfigBuilder, ImageConfig, InlineData, Part, PrebuiltVoiceConfig, PromptFeedback,
    SpeechConfig, VoiceConfig,
};

/// Result type for Gemini calls before conversion to `MasalError`.
pub type GeminiResult<T> = Result<T, masal_error::GeminiError>;
