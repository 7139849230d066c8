//! Durable key/value storage for the client state.
//!
//! The contract mirrors browser local storage: string keys, string values,
//! and operations that never fail from the caller's point of view.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Storage persisted as a JSON object in a single file.
///
/// The in-memory copy is authoritative for the lifetime of the process; every
/// mutation rewrites the file, so a write that failed once is repaired by the
/// next one. Write failures are logged, never returned.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!(path = ?path, keys = entries.len(), "Opened file storage");
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        if let Err(error) = write_entries(&self.path, entries) {
            warn!(path = ?self.path, %error, "Fail to persist storage");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        entries.remove(key);
        self.persist(&entries);
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(error) => {
            warn!(path = ?path, %error, "Fail to read storage, starting empty");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|error| {
        warn!(path = ?path, %error, "Storage file is not valid, starting empty");
        BTreeMap::new()
    })
}

/// Replaces the file through a sibling temp file and a rename, so a crash
/// mid-write leaves the previous content in place.
fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;
    let mut file = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut file, entries)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "abc");
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY);
        assert_eq!(storage.get(TOKEN_KEY), None);
        storage.remove(TOKEN_KEY);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "abc123");
        storage.set(THEME_KEY, "dark");
        storage.remove(THEME_KEY);
        drop(storage);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc123"));
        assert_eq!(reopened.get(THEME_KEY), None);
    }

    #[test]
    fn file_storage_retries_failed_write_on_same_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file where a directory should be").unwrap();
        let path = blocker.join("storage.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "abc123");
        assert!(!path.exists());

        fs::remove_file(&blocker).unwrap();
        storage.set(TOKEN_KEY, "abc123");

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc123"));
    }

    #[test]
    fn file_storage_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "one");
        storage.set(TOKEN_KEY, "two");
        storage.remove(TOKEN_KEY);

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn file_storage_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "fresh");
        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("fresh"));
    }
}
