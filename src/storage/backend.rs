//! Key/value storage backends.
//!
//! The simulation never touches paths directly. Everything it persists goes
//! through [`StorageBackend`], keyed by flat names such as `state_42.json`.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Capabilities the simulation needs from persistent storage.
///
/// ## Implementation Notes
///
/// - `save` must be atomic: readers see the old value or the new one, never
///   a partial write
/// - `list` returns matching keys sorted ascending
/// - `remove` and `unlock` succeed when the key is already absent
/// - `try_lock` returns `false` instead of blocking when the lock is held
pub trait StorageBackend: Send + Sync {
    /// Read a value, `None` if the key does not exist.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a value atomically, replacing any previous one.
    fn save(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Whether a value exists for `key`.
    fn exists(&self, key: &str) -> Result<bool>;

    /// All keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Delete a value.
    fn remove(&self, key: &str) -> Result<()>;

    /// Take an exclusive lock named `key`. `false` if someone else holds it.
    fn try_lock(&self, key: &str) -> Result<bool>;

    /// Release a lock taken with `try_lock`.
    fn unlock(&self, key: &str) -> Result<()>;
}

/// Stores each key as a file in one directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target. Locks are `<key>.lock` files created exclusively and
/// holding the owner's pid. A lock outlives a crashed process; delete the
/// file by hand once no run is active.
#[derive(Clone, Debug)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.lock"))
    }
}

impl StorageBackend for FsBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(key)).map_err(|e| e.error)?;
        debug!(key, bytes = data.len(), "saved");
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path(key).try_exists()?)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) && !name.ends_with(".lock") {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn try_lock(&self, key: &str) -> Result<bool> {
        let opened = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.lock_path(key));
        match opened {
            Ok(mut file) => {
                writeln!(file, "{}", std::process::id())?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn unlock(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.lock_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<FxHashMap<String, Vec<u8>>>,
    locks: Mutex<FxHashSet<String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.contains_key(key))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = values
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }

    fn try_lock(&self, key: &str) -> Result<bool> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(locks.insert(key.to_string()))
    }

    fn unlock(&self, key: &str) -> Result<()> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(backend: &dyn StorageBackend) {
        assert_eq!(backend.load("a_1").unwrap(), None);
        assert!(!backend.exists("a_1").unwrap());

        backend.save("a_2", b"two").unwrap();
        backend.save("a_1", b"one").unwrap();
        backend.save("b_1", b"other").unwrap();
        backend.save("a_1", b"uno").unwrap();

        assert_eq!(backend.load("a_1").unwrap().as_deref(), Some(&b"uno"[..]));
        assert!(backend.exists("a_2").unwrap());
        assert_eq!(backend.list("a_").unwrap(), vec!["a_1", "a_2"]);

        backend.remove("a_1").unwrap();
        backend.remove("a_1").unwrap();
        assert_eq!(backend.list("a_").unwrap(), vec!["a_2"]);
    }

    fn exercise_locks(backend: &dyn StorageBackend) {
        assert!(backend.try_lock("seed_1").unwrap());
        assert!(!backend.try_lock("seed_1").unwrap());
        assert!(backend.try_lock("seed_2").unwrap());

        backend.unlock("seed_1").unwrap();
        assert!(backend.try_lock("seed_1").unwrap());
        backend.unlock("seed_1").unwrap();
        backend.unlock("seed_1").unwrap();
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        exercise(&backend);
        exercise_locks(&backend);
    }

    #[test]
    fn test_fs_backend() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("data")).unwrap();
        exercise(&backend);
        exercise_locks(&backend);
    }

    #[test]
    fn test_fs_list_skips_locks_and_temp_files() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path()).unwrap();

        backend.save("state_1.json", b"{}").unwrap();
        assert!(backend.try_lock("state_1").unwrap());

        assert_eq!(backend.list("").unwrap(), vec!["state_1.json"]);
    }
}
