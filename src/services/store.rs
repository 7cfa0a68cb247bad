use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String-keyed persistent store, the crate's localStorage equivalent.
///
/// All operations fail soft: a corrupt or unreadable backing file is
/// treated as an empty store, and write failures are logged rather than
/// surfaced. Values are whole-entry replacements, so concurrent writers
/// are commutative under last-write-wins.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and ephemeral embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }
}

/// File-backed store: one JSON object file mapping keys to values.
///
/// The whole map is re-read on every access and rewritten on every
/// mutation; entries are small (one search result set per user scope)
/// so this stays cheap.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("corrupt store file {}, treating as empty: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) {
        let encoded = match serde_json::to_string(map) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("failed to encode store file: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create store directory {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, encoded) {
            tracing::warn!("failed to write store file {}: {}", self.path.display(), e);
        }
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v1");
        assert_eq!(store.get("k").as_deref(), Some("v1"));

        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));

        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));

        store.set("a", "1");
        store.set("b", "2");
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.remove("a");
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        FileStore::new(&path).set("k", "persisted");
        assert_eq!(FileStore::new(&path).get("k").as_deref(), Some("persisted"));
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("k"), None);

        // Writing recovers the file
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_missing_file_treated_as_empty() {
        let store = FileStore::new("/nonexistent/dir/that/does/not/exist.json");
        assert_eq!(store.get("k"), None);
        // Remove on a missing file is a no-op, not a failure
        store.remove("k");
    }
}
