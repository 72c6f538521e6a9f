//! Key-value storage behind the state store

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};

/// Somewhere a document can be kept under a fixed key
pub trait StateBackend: Send {
    /// Read the raw document, `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the raw document
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state from {:?}", path))?;
        Ok(Some(contents))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.dir))?;

        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write state to {:?}", path))?;

        Ok(())
    }
}

/// In-process backend; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key before handing the backend to a store
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Current raw value under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok().and_then(|entries| entries.get(key).cloned())
    }
}

impl StateBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("memory backend poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("memory backend poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
