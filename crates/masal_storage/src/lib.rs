//! Local key-value storage.
//!
//! Quota bookkeeping lives on the user's device in a small string-to-string
//! store. [`KeyValueStore`] is the seam; [`InMemoryStore`] backs tests and
//! ephemeral sessions, [`JsonFileStore`] persists everything in one JSON file.
//!
//! # Example
//!
//! ```rust
//! use masal_storage::{InMemoryStore, KeyValueStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! store.set("masal_promo_used", "true")?;
//! assert_eq!(store.get("masal_promo_used")?.as_deref(), Some("true"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;
mod memory;
mod store;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use store::KeyValueStore;
