//! Story generation orchestrator for Masal.
//!
//! A [`StorySession`] takes a [`UserInput`](masal_core::UserInput) through the
//! whole flow: quota check, story text, quota consumption, then concurrent
//! illustration and narration of every page. Each step is published as an
//! [`AppState`] on a watch channel for whatever presents the story.
//!
//! # Example
//!
//! ```rust,ignore
//! use masal_core::{AgeGroup, QuotaPolicy, UserInputBuilder};
//! use masal_models::GeminiClient;
//! use masal_pipeline::{AppState, Generators, PipelineOptions, StorySession};
//! use masal_quota::{CooldownGate, QuotaLedger};
//! use masal_storage::InMemoryStore;
//! use std::sync::Arc;
//!
//! let client = Arc::new(GeminiClient::from_config(&config, None)?);
//! let session = StorySession::new(
//!     QuotaLedger::new(InMemoryStore::new(), QuotaPolicy::default()),
//!     CooldownGate::new(),
//!     Generators::from_provider(client),
//!     PipelineOptions::default(),
//! )?;
//!
//! let input = UserInputBuilder::default()
//!     .child_name("Ayşe")
//!     .age_group(AgeGroup::Toddler)
//!     .theme("Uzay Macerası")
//!     .build()?;
//!
//! match session.submit(&input).await {
//!     Ok(AppState::Reading { story }) => println!("{}", story.title),
//!     Ok(other) => println!("{}", other),
//!     Err(rejection) => println!("{}", rejection),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod normalize;
mod options;
mod session;
mod state;

pub use normalize::normalize_story;
pub use options::{
    COVER_PROMPT_SUFFIX, PAGE_PROMPT_SUFFIX, PipelineOptions, PipelineOptionsBuilder,
};
pub use session::{Generators, StorySession};
pub use state::{AppState, GENERIC_FAILURE_MESSAGE, Progress};
