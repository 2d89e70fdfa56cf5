//! Core data types for the Masal story generator.
//!
//! This crate provides the data model shared by every other crate: the form a
//! caller fills in ([`UserInput`]), the story document produced by the pipeline
//! ([`StoryData`], [`StoryPage`]), generated media ([`ImageRef`], [`AudioPayload`])
//! and the tunable policies for quota and cooldown.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;
mod media;
mod policy;
mod story;

pub use input::{AgeGroup, Gender, UserInput, UserInputBuilder};
pub use media::{AudioPayload, ImageRef, PLACEHOLDER_IMAGE_BASE};
pub use policy::{
    CooldownPolicy, CooldownPolicyBuilder, DEFAULT_PROMO_CODES, QuotaPolicy, QuotaPolicyBuilder,
};
pub use story::{StoryData, StoryPage};
