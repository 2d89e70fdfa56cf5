//! JSON-file store.

use crate::KeyValueStore;
use masal_error::{MasalResult, StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, instrument};

type Document = BTreeMap<String, String>;

/// Key-value store persisted as a single JSON object.
///
/// Every operation reads the file afresh, so several stores (or processes)
/// pointed at the same path see each other's writes. Writes go to a
/// sibling temp file that is then renamed over the original.
///
/// ```json
/// {
///   "masal_promo_used": "true",
///   "masal_quota": "{\"count\":1,\"resetTime\":1735689600000}"
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (without reading) the store at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> MasalResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        debug!("Opened JSON file store");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Default location: `{data_dir}/masal/storage.json`.
    ///
    /// Falls back to the current directory when the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("masal"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storage.json")
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> MasalResult<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
            .into()
        })
    }

    fn write(&self, document: &Document) -> MasalResult<()> {
        let contents = serde_json::to_string_pretty(document).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "serialize {}: {}",
                self.path.display(),
                e
            )))
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
        })?;

        debug!(path = %self.path.display(), keys = document.len(), "Saved store");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> MasalResult<()> {
        let _guard = self.write_lock.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::LockPoisoned(e.to_string()))
        })?;
        let mut document = self.read()?;
        apply(&mut document);
        self.write(&document)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> MasalResult<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> MasalResult<()> {
        debug!(key, "Setting stored value");
        self.update(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> MasalResult<()> {
        debug!(key, "Removing stored value");
        self.update(|doc| {
            doc.remove(key);
        })
    }
}
