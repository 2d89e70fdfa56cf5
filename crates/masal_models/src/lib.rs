//! Generation backends for the Masal story generator.
//!
//! [`GeminiClient`] talks to the Gemini REST API and implements all three
//! generation traits: it writes the story, draws the illustrations and
//! narrates the pages.
//!
//! # Example
//!
//! ```no_run
//! use masal_core::{AgeGroup, UserInputBuilder};
//! use masal_interface::{Illustrator, StoryWriter};
//! use masal_models::GeminiClient;
//! use masal_rate_limit::MasalConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MasalConfig::load()?;
//! let client = GeminiClient::from_config(&config, None)?;
//!
//! let input = UserInputBuilder::default()
//!     .child_name("Ayşe")
//!     .age_group(AgeGroup::Toddler)
//!     .theme("Uzay Macerası")
//!     .build()?;
//!
//! let story = client.write_story(&input).await?;
//! let cover = client.illustrate(&story.cover_image_prompt).await?;
//! println!("{}: {}", story.title, cover.as_str().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod gemini;
mod prompt;

pub use extraction::extract_json;
pub use gemini::{
    Candidate, Content, GeminiClient, GeminiResult, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, GenerationConfigBuilder, ImageConfig, InlineData,
    Part, PrebuiltVoiceConfig, PromptFeedback, SpeechConfig, VoiceConfig,
};
pub use prompt::{build_story_prompt, story_response_schema};
