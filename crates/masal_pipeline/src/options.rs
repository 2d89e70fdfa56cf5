//! Tunables for a story session.

use masal_core::CooldownPolicy;
use masal_error::{BuilderError, MasalResult};

/// Appended to the cover illustration prompt.
pub const COVER_PROMPT_SUFFIX: &str =
    " . Cinematic lighting, highly detailed cover art, title space at top.";

/// Appended to every page illustration prompt.
pub const PAGE_PROMPT_SUFFIX: &str =
    " . High quality, children's book illustration, warm lighting, 4k, detailed.";

/// Options for a [`StorySession`](crate::StorySession).
///
/// # Examples
///
/// ```
/// use masal_core::CooldownPolicy;
/// use masal_pipeline::PipelineOptionsBuilder;
///
/// let options = PipelineOptionsBuilder::default()
///     .cooldown(CooldownPolicy::builder().duration_secs(5).build())
///     .build()
///     .unwrap();
///
/// assert_eq!(options.cooldown().duration().as_secs(), 5);
/// assert!(options.page_prompt_suffix().contains("children's book"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(
    default,
    setter(into),
    build_fn(private, name = "build_internal", validate = "Self::validate")
)]
pub struct PipelineOptions {
    /// Lock armed after every successful story text.
    cooldown: CooldownPolicy,
    /// Appended to the cover prompt.
    cover_prompt_suffix: String,
    /// Appended to each page prompt.
    page_prompt_suffix: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            cooldown: CooldownPolicy::default(),
            cover_prompt_suffix: COVER_PROMPT_SUFFIX.to_string(),
            page_prompt_suffix: PAGE_PROMPT_SUFFIX.to_string(),
        }
    }
}

impl PipelineOptions {
    /// Default options with the given cooldown.
    pub fn with_cooldown(cooldown: CooldownPolicy) -> Self {
        Self {
            cooldown,
            ..Self::default()
        }
    }

    /// Full prompt for the cover illustration.
    pub fn cover_prompt(&self, prompt: &str) -> String {
        format!("{}{}", prompt, self.cover_prompt_suffix)
    }

    /// Full prompt for a page illustration.
    pub fn page_prompt(&self, prompt: &str) -> String {
        format!("{}{}", prompt, self.page_prompt_suffix)
    }
}

impl PipelineOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.cooldown {
            Some(cooldown) => cooldown.validate(),
            None => Ok(()),
        }
    }

    /// Build the options.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the cooldown policy is invalid.
    #[track_caller]
    pub fn build(&self) -> MasalResult<PipelineOptions> {
        self.build_internal()
            .map_err(|e| BuilderError::invalid("PipelineOptions", e.to_string()).into())
    }
}
