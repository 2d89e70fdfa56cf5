//! Tests for configuration loading.

use masal_rate_limit::{MasalConfig, ModelLimits, Tier, TierConfig};
use std::collections::HashMap;
use std::io::Write;

#[test]
fn bundled_defaults_describe_gemini_free_tier() -> anyhow::Result<()> {
    let config = MasalConfig::from_toml_str("")?;

    let gemini = &config.providers["gemini"];
    assert_eq!(gemini.default_tier, "free");

    let free = config
        .get_tier("gemini", None)
        .ok_or_else(|| anyhow::anyhow!("free tier missing"))?;
    assert_eq!(free.name, "Free");
    assert_eq!(free.rpm, Some(10));
    assert_eq!(free.rpd, Some(250));

    let paid = config
        .get_tier("gemini", Some("payasyougo"))
        .ok_or_else(|| anyhow::anyhow!("paid tier missing"))?;
    assert_eq!(paid.rpd, None);
    Ok(())
}

#[test]
fn bundled_defaults_match_policy_defaults() -> anyhow::Result<()> {
    let config = MasalConfig::from_toml_str("")?;

    assert_eq!(config.quota, masal_core::QuotaPolicy::default());
    assert_eq!(config.cooldown, masal_core::CooldownPolicy::default());
    assert_eq!(config.models.story_model, "gemini-2.5-flash");
    assert_eq!(config.models.image_model, "gemini-2.5-flash-image");
    assert_eq!(config.models.speech_model, "gemini-2.5-flash-preview-tts");
    assert_eq!(config.models.voice, "Kore");
    assert_eq!(config.models.page_count, 5);
    Ok(())
}

#[test]
fn user_file_overrides_individual_keys() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[quota]
limit = 3

[cooldown]
duration_secs = 5

[models]
voice = "Puck"
"#
    )?;

    let config = MasalConfig::from_file(file.path())?;

    assert_eq!(*config.quota.limit(), 3);
    assert_eq!(*config.quota.reset_period_secs(), 21_600);
    assert_eq!(config.cooldown.duration().as_secs(), 5);
    assert_eq!(config.models.voice, "Puck");
    assert_eq!(config.models.story_model, "gemini-2.5-flash");
    assert!(config.get_tier("gemini", None).is_some());
    Ok(())
}

#[test]
fn invalid_policies_are_rejected() {
    assert!(MasalConfig::from_toml_str("[quota]\nlimit = 0").is_err());
    assert!(MasalConfig::from_toml_str("[quota]\nreset_period_secs = 0").is_err());
    assert!(MasalConfig::from_toml_str("[cooldown]\ntick_millis = 0").is_err());
    assert!(MasalConfig::from_toml_str("[models]\npage_count = 0").is_err());
    assert!(MasalConfig::from_toml_str("not = [valid").is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(MasalConfig::from_file("/nonexistent/masal.toml").is_err());
}

#[test]
fn model_overrides_fall_back_to_tier_defaults() {
    let mut models = HashMap::new();
    models.insert(
        "gemini-2.5-flash-image".to_string(),
        ModelLimits {
            rpm: Some(2),
            ..Default::default()
        },
    );
    let tier = TierConfig {
        name: "Free".to_string(),
        rpm: Some(10),
        tpm: Some(250_000),
        rpd: Some(250),
        max_concurrent: Some(4),
        models,
    };

    let image = tier.for_model("gemini-2.5-flash-image");
    assert_eq!(image.rpm(), Some(2));
    assert_eq!(image.rpd(), Some(250));
    assert_eq!(image.max_concurrent(), Some(4));

    let text = tier.for_model("gemini-2.5-flash");
    assert_eq!(text.rpm(), Some(10));
    assert_eq!(text.tpm(), Some(250_000));
    assert!(text.models.is_empty());
}
