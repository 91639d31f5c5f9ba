//! [`KeyValueStore`] backends.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;
use upskill_core::error::{UpskillError, UpskillResult};
use upskill_core::storage::KeyValueStore;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> UpskillResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> UpskillResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> UpskillResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Durable store backed by a single JSON object on disk.
///
/// A missing or empty file reads as an empty store. Writes go to a
/// sibling temp file which is then renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<config dir>/upskillhub/session.json`, when the platform has a
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("upskillhub").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; `None` when the file is missing or blank.
    fn read(&self) -> UpskillResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn load(&self) -> UpskillResult<BTreeMap<String, String>> {
        match self.read()? {
            Some(content) => serde_json::from_str(&content).map_err(|e| storage_error(&self.path, e)),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> UpskillResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| UpskillError::Storage(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| storage_error(&tmp_path, e))?;
            file.write_all(json.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| storage_error(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| storage_error(&self.path, e))
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> UpskillResult<()> {
        let _guard = self.lock.lock();
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries: BTreeMap<String, String> = match self.read()? {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Overwriting unreadable session file");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        apply(&mut entries);
        self.save(&entries)
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> UpskillError {
    UpskillError::Storage(format!("{}: {err}", path.display()))
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> UpskillResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> UpskillResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> UpskillResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
