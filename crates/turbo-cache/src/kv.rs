//! Key-Value store wrapper with automatic serialization.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

const FILE_EXTENSION: &str = "json";

/// Where the bytes actually live.
#[derive(Debug)]
enum Backend {
    /// Process-local map; gone when the process exits.
    Memory(RwLock<HashMap<String, Vec<u8>>>),
    /// One file per key inside a directory.
    Directory(PathBuf),
}

/// Type-safe key-value store.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Every `set` replaces the whole value
/// stored under the key; there are no partial writes.
#[derive(Debug)]
pub struct Cache {
    backend: Backend,
}

impl Cache {
    /// Create a store that only lives in memory.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(RwLock::new(HashMap::new())),
        }
    }

    /// Open a directory-backed store, creating the directory if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("/var/lib/storefront")?;
    /// ```
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            backend: Backend::Directory(dir),
        })
    }

    /// The backing directory, if this store is directory-backed.
    pub fn dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Memory(_) => None,
            Backend::Directory(dir) => Some(dir.as_path()),
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, bytes)
    }

    /// Delete a value from the cache. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write()
                    .map_err(|_| poisoned())?
                    .remove(key);
                Ok(())
            }
            Backend::Directory(dir) => match fs::remove_file(slot_path(dir, key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.read().map_err(|_| poisoned())?.contains_key(key)),
            Backend::Directory(dir) => Ok(slot_path(dir, key).is_file()),
        }
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        match &self.backend {
            Backend::Memory(map) => {
                let mut keys: Vec<String> =
                    map.read().map_err(|_| poisoned())?.keys().cloned().collect();
                keys.sort();
                Ok(keys)
            }
            Backend::Directory(dir) => {
                let mut keys = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let path = entry?.path();
                    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                        continue;
                    }
                    if let Some(key) = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .and_then(decode_key)
                    {
                        keys.push(key);
                    }
                }
                keys.sort();
                Ok(keys)
            }
        }
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.read().map_err(|_| poisoned())?.get(key).cloned()),
            Backend::Directory(dir) => match fs::read(slot_path(dir, key)) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write()
                    .map_err(|_| poisoned())?
                    .insert(key.to_string(), bytes);
                Ok(())
            }
            Backend::Directory(dir) => {
                // Readers only ever see a complete slot.
                let path = slot_path(dir, key);
                let tmp = path.with_extension("tmp");
                fs::write(&tmp, &bytes)?;
                if let Err(e) = fs::rename(&tmp, &path) {
                    let _ = fs::remove_file(&tmp);
                    return Err(e.into());
                }
                tracing::trace!(key, bytes = bytes.len(), "slot written");
                Ok(())
            }
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Keys may contain characters that are not valid in file names (`@`, `:`).
fn slot_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), FILE_EXTENSION))
}

fn decode_key(stem: &str) -> Option<String> {
    URL_SAFE_NO_PAD
        .decode(stem)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

fn poisoned() -> CacheError {
    CacheError::StoreError("lock poisoned".to_string())
}
