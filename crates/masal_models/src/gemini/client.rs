//! Gemini REST client.
//!
//! One [`GeminiClient`] serves all three generation roles. Each role uses its
//! own model and its own [`RateLimiter`], configured from the tier in
//! `masal.toml` with model-specific overrides applied.

use super::GeminiResult;
use super::dto::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GenerationConfigBuilder,
    ImageConfig, SpeechConfig,
};
use crate::{build_story_prompt, extract_json, story_response_schema};
use async_trait::async_trait;
use masal_core::{AudioPayload, ImageRef, StoryData, UserInput};
use masal_error::{
    BuilderError, GeminiError, GeminiErrorKind, MasalResult,
    PipelineError, PipelineErrorKind,
};
use masal_interface::{Illustrator, Narrator, StoryWriter};
use masal_rate_limit::{MasalConfig, ModelsConfig, RateLimiter, Tier, TierConfig};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Environment variable holding the API key.
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    models: ModelsConfig,
    story_limiter: RateLimiter<TierConfig>,
    image_limiter: RateLimiter<TierConfig>,
    speech_limiter: RateLimiter<TierConfig>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.models.base_url)
            .field("story_model", &self.models.story_model)
            .field("image_model", &self.models.image_model)
            .field("speech_model", &self.models.speech_model)
            .field("tier", &self.story_limiter.inner().name())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from configuration, reading the API key from `GEMINI_API_KEY`.
    ///
    /// `tier_name` selects a tier under `[providers.gemini.tiers]`; `None`
    /// uses the provider's default tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set or the HTTP client cannot be built.
    #[instrument(name = "gemini_client_from_config", skip(config))]
    pub fn from_config(config: &MasalConfig, tier_name: Option<&str>) -> MasalResult<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        Self::with_api_key(api_key, config, tier_name)
    }

    /// Create a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(name = "gemini_client_with_api_key", skip(api_key, config))]
    pub fn with_api_key(
        api_key: impl Into<String>,
        config: &MasalConfig,
        tier_name: Option<&str>,
    ) -> MasalResult<Self> {
        let tier = config.get_tier("gemini", tier_name).unwrap_or_else(|| {
            warn!(?tier_name, "No Gemini tier configured, requests are not rate limited");
            TierConfig::unlimited()
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        let models = config.models.clone();
        debug!(
            tier = tier.name(),
            story_model = %models.story_model,
            image_model = %models.image_model,
            speech_model = %models.speech_model,
            "Created Gemini client"
        );

        Ok(Self {
            http,
            api_key: api_key.into(),
            story_limiter: RateLimiter::new(tier.for_model(&models.story_model)),
            image_limiter: RateLimiter::new(tier.for_model(&models.image_model)),
            speech_limiter: RateLimiter::new(tier.for_model(&models.speech_model)),
            models,
        })
    }

    /// Override the error-specific retry strategy for every model.
    pub fn with_retry_overrides(
        mut self,
        retry_backoff_ms: Option<u64>,
        max_retries: Option<usize>,
    ) -> Self {
        self.story_limiter = self
            .story_limiter
            .with_retry_overrides(retry_backoff_ms, max_retries);
        self.image_limiter = self
            .image_limiter
            .with_retry_overrides(retry_backoff_ms, max_retries);
        self.speech_limiter = self
            .speech_limiter
            .with_retry_overrides(retry_backoff_ms, max_retries);
        self
    }

    /// Model names and request shaping in use.
    pub fn models(&self) -> &ModelsConfig {
        &self.models
    }

    /// Call `generateContent` on `model` under `limiter`, retrying transient failures.
    #[instrument(skip(self, limiter, request))]
    async fn generate_content(
        &self,
        limiter: &RateLimiter<TierConfig>,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.models.base_url.trim_end_matches('/'),
            model
        );

        limiter
            .execute(request.estimated_tokens(), || self.send(&url, request))
            .await
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        debug!(url, "Sending Gemini request");

        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            // The URL carries the API key; keep it out of error messages.
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.without_url().to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::InvalidResponse(
                e.without_url().to_string(),
            ))
        })
    }

    fn generation_config(builder: &GenerationConfigBuilder) -> MasalResult<GenerationConfig> {
        builder
            .build()
            .map_err(|e| BuilderError::invalid("GenerationConfig", e.to_string()).into())
    }

    fn blocked(response: &GenerateContentResponse) -> Option<GeminiError> {
        response
            .block_reason()
            .map(|reason| GeminiError::new(GeminiErrorKind::Blocked(reason.to_string())))
    }
}

#[async_trait]
impl StoryWriter for GeminiClient {
    #[instrument(skip(self, input), fields(age_group = %input.age_group(), theme = %input.theme()))]
    async fn write_story(&self, input: &UserInput) -> MasalResult<StoryData> {
        let prompt = build_story_prompt(input, self.models.page_count);
        let config = Self::generation_config(
            GenerationConfigBuilder::default()
                .response_mime_type("application/json")
                .response_schema(story_response_schema(self.models.page_count)),
        )?;
        let request = GenerateContentRequest::from_text(prompt, config);

        let response = self
            .generate_content(&self.story_limiter, &self.models.story_model, &request)
            .await?;

        let Some(text) = response.text() else {
            if let Some(blocked) = Self::blocked(&response) {
                return Err(blocked.into());
            }
            return Err(PipelineError::new(PipelineErrorKind::GenerationFailed(
                "story model returned no text".to_string(),
            ))
            .into());
        };

        let json = extract_json(&text)?;
        let story: StoryData = serde_json::from_str(&json).map_err(|e| {
            PipelineError::new(PipelineErrorKind::GenerationFailed(format!(
                "story response does not match the schema: {}",
                e
            )))
        })?;

        info!(title = %story.title, pages = story.page_count(), "Story text generated");
        Ok(story)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl Illustrator for GeminiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn illustrate(&self, prompt: &str) -> MasalResult<ImageRef> {
        let config = Self::generation_config(GenerationConfigBuilder::default().image_config(
            ImageConfig {
                aspect_ratio: self.models.aspect_ratio.clone(),
            },
        ))?;
        let request = GenerateContentRequest::from_text(prompt, config);

        let response = self
            .generate_content(&self.image_limiter, &self.models.image_model, &request)
            .await?;

        match response.inline_data() {
            Some(data) => {
                let mime = if data.mime_type().is_empty() {
                    "image/png"
                } else {
                    data.mime_type().as_str()
                };
                debug!(mime, bytes_b64 = data.data().len(), "Illustration generated");
                Ok(ImageRef::inline(mime, data.data()))
            }
            None => match Self::blocked(&response) {
                Some(blocked) => Err(blocked.into()),
                None => Err(PipelineError::new(PipelineErrorKind::MissingImage(
                    self.models.image_model.clone(),
                ))
                .into()),
            },
        }
    }
}

#[async_trait]
impl Narrator for GeminiClient {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn narrate(&self, text: &str) -> MasalResult<AudioPayload> {
        let config = Self::generation_config(
            GenerationConfigBuilder::default()
                .response_modalities(vec!["AUDIO".to_string()])
                .speech_config(SpeechConfig::prebuilt(self.models.voice.clone())),
        )?;
        let request = GenerateContentRequest::from_text(text, config);

        let response = self
            .generate_content(&self.speech_limiter, &self.models.speech_model, &request)
            .await?;

        match response.inline_data() {
            Some(data) => {
                debug!(mime = %data.mime_type(), "Narration generated");
                Ok(AudioPayload::from_base64(data.data().clone()))
            }
            None => match Self::blocked(&response) {
                Some(blocked) => Err(blocked.into()),
                None => Err(PipelineError::new(PipelineErrorKind::MissingAudio(
                    self.models.speech_model.clone(),
                ))
                .into()),
            },
        }
    }
}
