//! Key-value storage backends for client-side state.
//!
//! `FileStore` is durable (survives restarts, like per-origin local
//! storage); `MemoryStore` lives exactly as long as the process-level
//! session that owns it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::ClientError;

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;

    /// Set `key` only if it is absent. Returns true when this call set it.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, ClientError>;
}

/// In-memory store, dropped with its owner.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, ClientError> {
        let mut entries = self.entries.lock();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

/// Durable store backed by a single TOML file of string values.
///
/// Writes go to a sibling temp file and are renamed into place, so a
/// reader never sees a half-written file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/storage.toml`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("storage.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ClientError::storage(format!("read '{}': {}", self.path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::storage(format!("parse '{}': {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::storage(format!("create '{}': {}", parent.display(), e))
            })?;
        }

        let content = toml::to_string(entries)
            .map_err(|e| ClientError::storage(format!("serialize: {}", e)))?;
        // Unique per write so two processes never share a temp file
        let tmp = self
            .path
            .with_extension(format!("toml.{}.tmp", uuid::Uuid::new_v4()));
        let written = fs::write(&tmp, content)
            .map_err(|e| ClientError::storage(format!("write '{}': {}", tmp.display(), e)))
            .and_then(|()| {
                restrict_permissions(&tmp);
                fs::rename(&tmp, &self.path).map_err(|e| {
                    ClientError::storage(format!("replace '{}': {}", self.path.display(), e))
                })
            });
        if written.is_err() && tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temp file");
            }
        }
        written
    }
}

// The file holds the bearer credential.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to restrict storage permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, ClientError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        Ok(true)
    }
}
