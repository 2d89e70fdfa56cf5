//! Configuration structures.
//!
//! Configuration is layered:
//! - Bundled defaults (include_str! from masal.toml)
//! - User overrides (~/.config/masal/masal.toml, then ./masal.toml)
//!
//! Later sources override earlier ones key by key.

use crate::Tier;
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use masal_core::{CooldownPolicy, QuotaPolicy};
use masal_error::{ConfigError, MasalResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../masal.toml");

/// Per-model limits layered over a tier. Unset fields inherit the tier's value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelLimits {
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    /// Estimated tokens per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,
    /// Requests per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,
    /// Requests in flight at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Limits of one named plan, read from `[providers.<name>.tiers.<tier>]`.
///
/// The image model usually has a much smaller daily allowance than the text
/// model, so tiers carry per-model overrides:
///
/// ```toml
/// [providers.gemini.tiers.free]
/// name = "Free"
/// rpm = 10
/// rpd = 250
///
/// [providers.gemini.tiers.free.models."gemini-2.5-flash-image"]
/// rpd = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Label shown in logs
    pub name: String,
    /// Requests per minute
    #[serde(default)]
    pub rpm: Option<u32>,
    /// Estimated tokens per minute
    #[serde(default)]
    pub tpm: Option<u64>,
    /// Requests per day
    #[serde(default)]
    pub rpd: Option<u32>,
    /// Requests in flight at once
    #[serde(default)]
    pub max_concurrent: Option<u32>,
    /// Overrides keyed by model name
    #[serde(default)]
    pub models: HashMap<String, ModelLimits>,
}

impl Tier for TierConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }
}

impl TierConfig {
    /// The limits that apply to `model`, with its overrides folded in.
    pub fn for_model(&self, model: &str) -> TierConfig {
        let Some(limits) = self.models.get(model) else {
            return Self {
                models: HashMap::new(),
                ..self.clone()
            };
        };
        Self {
            name: self.name.clone(),
            rpm: limits.rpm.or(self.rpm),
            tpm: limits.tpm.or(self.tpm),
            rpd: limits.rpd.or(self.rpd),
            max_concurrent: limits.max_concurrent.or(self.max_concurrent),
            models: HashMap::new(),
        }
    }

    /// A tier that never waits.
    pub fn unlimited() -> Self {
        Self {
            name: "Unlimited".to_string(),
            rpm: None,
            tpm: None,
            rpd: None,
            max_concurrent: None,
            models: HashMap::new(),
        }
    }
}

/// Tiers offered by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Tier used when the caller names none
    pub default_tier: String,
    /// Tiers keyed by name
    pub tiers: HashMap<String, TierConfig>,
}

/// Model selection and request shaping for the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Base URL of the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model that writes the story text
    #[serde(default = "default_story_model")]
    pub story_model: String,

    /// Model that draws illustrations
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Model that narrates pages
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Prebuilt narrator voice
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Aspect ratio requested for illustrations
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Number of pages requested from the story model
    #[serde(default = "default_page_count")]
    pub page_count: u32,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_story_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_page_count() -> u32 {
    5
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            story_model: default_story_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            aspect_ratio: default_aspect_ratio(),
            page_count: default_page_count(),
        }
    }
}

/// Top-level Masal configuration.
///
/// # Example
///
/// ```no_run
/// use masal_rate_limit::MasalConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MasalConfig::load()?;
/// if let Some(tier) = config.get_tier("gemini", None) {
///     println!("{} tier allows {:?} requests a minute", tier.name, tier.rpm);
/// }
/// println!("{} stories per cycle", config.quota.limit());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct MasalConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Model names and request shaping
    #[serde(default)]
    pub models: ModelsConfig,

    /// Story quota policy
    #[serde(default)]
    pub quota: QuotaPolicy,

    /// Cooldown after each story
    #[serde(default)]
    pub cooldown: CooldownPolicy,
}

impl MasalConfig {
    /// Load bundled defaults overridden by a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MasalResult<Self> {
        debug!("Loading configuration from file");

        let builder = Self::defaults().add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the resulting
    /// configuration is invalid.
    #[instrument]
    pub fn load() -> MasalResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/masal/masal.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("masal").required(false));

        Self::finish(builder)
    }

    /// Parse configuration from a TOML string layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML or the configuration is invalid.
    pub fn from_toml_str(toml: &str) -> MasalResult<Self> {
        let builder = Self::defaults().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> MasalResult<Self> {
        let merged = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read configuration: {}", e)))?;
        let config: Self = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate policies and model settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> MasalResult<()> {
        self.quota
            .validate()
            .map_err(|e| ConfigError::in_section("quota", e))?;
        self.cooldown
            .validate()
            .map_err(|e| ConfigError::in_section("cooldown", e))?;
        if self.models.page_count == 0 {
            return Err(
                ConfigError::in_section("models", "page_count must be at least 1").into(),
            );
        }
        Ok(())
    }

    /// The named tier of `provider`, or its default tier when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider = self.providers.get(provider)?;
        let tier = tier_name.unwrap_or(&provider.default_tier);
        debug!(tier, "Resolving tier");
        provider.tiers.get(tier).cloned()
    }
}
