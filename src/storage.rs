use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageError;

/// File holding every user record, keyed by username.
pub const USERS_FILE: &str = "users.json";
/// File holding a snapshot of the logged-in user, or `null`.
pub const SESSION_FILE: &str = "current_user.json";

/// Snapshot files inside one data directory.
///
/// Every write replaces the whole file; there are no partial updates.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Store {
        Store { dir: dir.into() }
    }

    /// Returns the path of a snapshot file in the data directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Reads and parses a snapshot.
    ///
    /// Distinguishes a missing file from one that cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.path(name);
        let mut f = match OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing(name.to_string()))
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        serde_json::from_str(&s).map_err(|e| StorageError::Corrupt(name.to_string(), e))
    }

    /// Reads a snapshot, falling back to `T::default()` when it is missing or corrupt.
    pub fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.read(name) {
            Ok(value) => value,
            Err(StorageError::Missing(_)) => {
                debug!(file = name, "no snapshot yet, starting empty");
                T::default()
            }
            Err(err) => {
                warn!(file = name, "discarding unreadable snapshot: {err}");
                T::default()
            }
        }
    }

    /// Overwrites a snapshot through a temporary file and a rename.
    pub fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(name);
        let temp = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(value)?;
        let mut f = File::create(&temp)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(&temp, &path)?;
        debug!(file = name, bytes = content.len(), "snapshot written");
        Ok(())
    }

    /// Deletes a snapshot. A file that is already gone is not an error.
    pub fn remove(&self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn missing_and_corrupt_snapshots_degrade_to_default() {
        let dir = tempdir().expect("tempdir");
        let store = Store::new(dir.path());

        assert!(matches!(
            store.read::<BTreeMap<String, u32>>(USERS_FILE),
            Err(StorageError::Missing(_))
        ));

        fs::write(store.path(USERS_FILE), "{not json").unwrap();
        assert!(matches!(
            store.read::<BTreeMap<String, u32>>(USERS_FILE),
            Err(StorageError::Corrupt(_, _))
        ));
        let fallback: BTreeMap<String, u32> = store.read_or_default(USERS_FILE);
        assert!(fallback.is_empty());
    }

    #[test]
    fn write_overwrites_and_creates_directory() {
        let dir = tempdir().expect("tempdir");
        let store = Store::new(dir.path().join("nested"));

        let mut first = BTreeMap::new();
        first.insert("a".to_string(), 1u32);
        first.insert("b".to_string(), 2u32);
        store.write(USERS_FILE, &first).unwrap();

        let mut second = BTreeMap::new();
        second.insert("c".to_string(), 3u32);
        store.write(USERS_FILE, &second).unwrap();

        let loaded: BTreeMap<String, u32> = store.read(USERS_FILE).unwrap();
        assert_eq!(loaded, second);
        assert!(!store.path("users.tmp").exists());
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let dir = tempdir().expect("tempdir");
        let store = Store::new(dir.path());
        store.write(SESSION_FILE, &Option::<u32>::None).unwrap();
        store.remove(SESSION_FILE).unwrap();
        store.remove(SESSION_FILE).unwrap();
        assert!(!store.path(SESSION_FILE).exists());
    }
}
