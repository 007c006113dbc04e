use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;

/// Durable client-local key-value storage (the role `localStorage` plays in a browser).
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Process-local storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.items.read().len() }

    pub fn is_empty(&self) -> bool { self.items.read().is_empty() }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> { self.items.read().get(key).cloned() }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// One file per key under a directory, `<dir>/<key>.json`. The directory is created on
/// first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "local storage read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create storage dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        // write-then-rename so a crash never leaves a half-written record
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("rename into {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clones_share_items() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        b.remove_item("k").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn file_storage_roundtrip_and_idempotent_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = FileStorage::new(tmp.path().join("state"));
        assert_eq!(fs.get_item("prpo_auth"), None);
        fs.set_item("prpo_auth", "{\"id\":1}").unwrap();
        assert!(fs.path_for("prpo_auth").exists());
        assert_eq!(fs.get_item("prpo_auth").as_deref(), Some("{\"id\":1}"));
        fs.set_item("prpo_auth", "{\"id\":2}").unwrap();
        assert_eq!(fs.get_item("prpo_auth").as_deref(), Some("{\"id\":2}"));
        fs.remove_item("prpo_auth").unwrap();
        fs.remove_item("prpo_auth").unwrap();
        assert_eq!(fs.get_item("prpo_auth"), None);
    }

    #[test]
    fn file_storage_sanitizes_keys() {
        let fs = FileStorage::new("/tmp/x");
        assert_eq!(fs.path_for("../evil/key"), PathBuf::from("/tmp/x/___evil_key.json"));
    }
}
