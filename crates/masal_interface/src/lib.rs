//! Trait definitions for the Masal story generator.
//!
//! A story is produced by three collaborators: a [`StoryWriter`] that turns the
//! caller's request into text, an [`Illustrator`] that draws the cover and each
//! page, and a [`Narrator`] that reads each page aloud. Providers implement
//! these traits; the pipeline only depends on them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{Illustrator, Narrator, StoryWriter};
