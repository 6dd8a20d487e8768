//! Durable search-string → location-key mapping.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

/// Key/value store backing location resolution.
///
/// Writes are single-key upserts; the last writer wins.
pub trait LocationCache: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    /// Persist pending writes.
    fn save(&self) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// JSON-file backed cache, loaded fully into memory.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileCache {
    /// Load the cache at `path`; a missing or corrupt file is an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(
                    "Ignoring unreadable cache file {}: {}",
                    path.display(),
                    e
                );
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LocationCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let json = {
            let entries = self.entries.read();
            serde_json::to_string_pretty(&*entries).context("Failed to serialize location cache")?
        };

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write cache file: {}", self.path.display()))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();

        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove cache file: {}", self.path.display()))?;
        }

        Ok(())
    }
}
