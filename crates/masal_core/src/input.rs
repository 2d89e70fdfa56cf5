//! The story request filled in by the caller.

use masal_error::{BuilderError, MasalResult};
use serde::{Deserialize, Serialize};

/// Reading level of the child the story is written for.
///
/// Parsed from and displayed as the short age label.
///
/// # Examples
///
/// ```
/// use masal_core::AgeGroup;
///
/// let age: AgeGroup = "3-5".parse().unwrap();
/// assert_eq!(age, AgeGroup::Toddler);
/// assert_eq!(AgeGroup::PreTeen.to_string(), "9+");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AgeGroup {
    /// Ages three to five
    #[serde(rename = "3-5")]
    #[strum(serialize = "3-5")]
    Toddler,
    /// Ages six to eight
    #[serde(rename = "6-8")]
    #[strum(serialize = "6-8")]
    Child,
    /// Nine and older
    #[serde(rename = "9+")]
    #[strum(serialize = "9+")]
    PreTeen,
}

impl AgeGroup {
    /// Writing guidelines for the story prompt, in the story's language.
    pub fn writing_guidelines(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => {
                "Çok kısa cümleler, basit kelimeler, bol tekrar ve somut kavramlar kullan. \
                 Sayfa başına en fazla 40-50 kelime."
            }
            AgeGroup::Child => {
                "Biraz daha uzun cümleler, hafif bir macera ve sebep-sonuç ilişkileri kullan. \
                 Sayfa başına en fazla 80-100 kelime."
            }
            AgeGroup::PreTeen => {
                "Zengin bir kelime hazinesi, ayrıntılı betimlemeler ve güçlü bir kurgu kullan. \
                 Sayfa başına en fazla 150 kelime."
            }
        }
    }
}

/// Gender of the story's hero.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    /// Girl
    Girl,
    /// Boy
    Boy,
    /// Not specified
    #[default]
    Unspecified,
}

/// A submitted story request.
///
/// Built once through [`UserInputBuilder`] and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use masal_core::{AgeGroup, UserInputBuilder};
///
/// let input = UserInputBuilder::default()
///     .child_name("Ayşe")
///     .age_group(AgeGroup::Toddler)
///     .theme("Uzay Macerası")
///     .build()
///     .unwrap();
///
/// assert_eq!(input.child_name(), "Ayşe");
/// assert!(input.hair_color().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(
    setter(into),
    build_fn(private, name = "build_internal", validate = "Self::validate")
)]
pub struct UserInput {
    /// Name of the child who becomes the hero.
    child_name: String,
    /// Reading level used to pick sentence length and vocabulary.
    age_group: AgeGroup,
    /// Gender of the hero.
    #[builder(default)]
    gender: Gender,
    /// Category or theme of the adventure.
    theme: String,
    /// Lesson the story should carry.
    #[builder(default)]
    advice: String,
    /// Optional hair color kept consistent across illustrations.
    #[builder(default, setter(into, strip_option))]
    hair_color: Option<String>,
    /// Optional eye color kept consistent across illustrations.
    #[builder(default, setter(into, strip_option))]
    eye_color: Option<String>,
}

impl UserInputBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.child_name {
            Some(name) if name.trim().is_empty() => {
                Err("child_name must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Build the input.
    ///
    /// # Errors
    ///
    /// Returns a builder error if a required field is missing or the child name is blank.
    #[track_caller]
    pub fn build(&self) -> MasalResult<UserInput> {
        self.build_internal().map_err(|e| {
            match e {
                UserInputBuilderError::UninitializedField(field) => {
                    BuilderError::missing("UserInput", field)
                }
                UserInputBuilderError::ValidationError(reason) => {
                    BuilderError::invalid("UserInput", reason)
                }
            }
            .into()
        })
    }
}

impl UserInput {
    /// Describes the hero's appearance for illustration prompts, if any was given.
    pub fn appearance(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.hair_color.as_ref().map(|h| format!("{} hair", h.trim())),
            self.eye_color.as_ref().map(|e| format!("{} eyes", e.trim())),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
