//! Masal - illustrated, narrated children's stories
//!
//! Masal turns a short description of a child and a theme into a picture
//! book: a story written for the child's age, an illustration for the cover
//! and every page, and a narration of every page. Story requests are limited
//! by a local quota ledger with one-time promo codes and a short cooldown
//! between stories.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use masal::{
//!     AgeGroup, CooldownGate, GeminiClient, Generators, JsonFileStore, MasalConfig,
//!     PipelineOptions, QuotaLedger, StorySession, UserInputBuilder,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MasalConfig::load()?;
//!     let store = JsonFileStore::open(JsonFileStore::default_path())?;
//!     let client = Arc::new(GeminiClient::from_config(&config, None)?);
//!
//!     let session = StorySession::new(
//!         QuotaLedger::new(store, config.quota.clone()),
//!         CooldownGate::new(),
//!         Generators::from_provider(client),
//!         PipelineOptions::with_cooldown(config.cooldown.clone()),
//!     )?;
//!
//!     let input = UserInputBuilder::default()
//!         .child_name("Ayşe")
//!         .age_group(AgeGroup::Toddler)
//!         .theme("Uzay Macerası")
//!         .build()?;
//!
//!     let state = session.submit(&input).await?;
//!     println!("{}", state);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `masal_error` - Error types
//! - `masal_core` - Story request, story document, media and policies
//! - `masal_interface` - Generation traits
//! - `masal_rate_limit` - Configuration, rate limiting and retry
//! - `masal_storage` - Local key-value storage
//! - `masal_quota` - Quota ledger and cooldown gate
//! - `masal_models` - Gemini backend
//! - `masal_pipeline` - Story session orchestrator
//!
//! This crate (`masal`) re-exports everything for convenience.

#![warn(missing_docs)]

mod export;
mod logging;

pub use export::{ExportSummary, export_story};
pub use logging::init_logging;

pub use masal_core::*;
pub use masal_error::*;
pub use masal_interface::*;
pub use masal_models::*;
pub use masal_pipeline::*;
pub use masal_quota::*;
pub use masal_rate_limit::*;
pub use masal_storage::*;

// OpenTelemetry observability module
#[cfg(feature = "observability")]
pub mod observability;
