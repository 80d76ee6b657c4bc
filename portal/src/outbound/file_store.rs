//! File-backed key-value store.
//!
//! Each key maps to `<key>.json` inside a single capability-scoped directory.
//! Writes go to a hidden temporary file in the same directory which is then
//! renamed over the target, so a slot is never observed half-written.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, StorageError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// [`KeyValueStore`] persisting each slot as a JSON file.
///
/// Keys are restricted to ASCII letters, digits, `_`, and `-` so they map
/// onto plain file names.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
}

impl FileKeyValueStore {
    /// Open (creating if needed) the storage directory at `path`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::ports::KeyValueStore;
    /// use portal::outbound::FileKeyValueStore;
    ///
    /// let root = tempfile::tempdir()?;
    /// let store = FileKeyValueStore::open(&root.path().join("portal"))?;
    /// store.set("user", "{}")?;
    /// assert_eq!(store.get("user")?.as_deref(), Some("{}"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let location = path.display().to_string();
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| StorageError::io(location.as_str(), err.to_string()))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| StorageError::io(location.as_str(), err.to_string()))?;
        debug!(path = %location, "file store opened");
        Ok(Self { dir })
    }

    fn file_name(key: &str) -> Result<String, StorageError> {
        let is_plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !is_plain {
            return Err(StorageError::invalid_key(key));
        }
        Ok(format!("{key}.json"))
    }

    fn write_atomic(&self, key: &str, file_name: &str, contents: &str) -> Result<(), StorageError> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let tmp_name = format!(
            ".{file_name}.tmp.{}.{suffix}.{counter}",
            std::process::id()
        );

        self.write_temp_file(&tmp_name, contents)
            .and_then(|()| self.dir.rename(&tmp_name, &self.dir, file_name))
            .map_err(|err| {
                // Best-effort cleanup of the temporary file.
                if self.dir.remove_file(&tmp_name).is_err() {
                    debug!(key, "temporary slot file already gone");
                }
                StorageError::io(key, err.to_string())
            })?;

        if self.dir.open(".").and_then(|dir| dir.sync_all()).is_err() {
            debug!(key, "directory sync skipped");
        }
        Ok(())
    }

    fn write_temp_file(&self, tmp_name: &str, contents: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = self.dir.open_with(tmp_name, &options)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let file_name = Self::file_name(key)?;
        match self.dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let file_name = Self::file_name(key)?;
        self.write_atomic(key, &file_name, value)?;
        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let file_name = Self::file_name(key)?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => {
                debug!(key, "slot removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(key, err.to_string())),
        }
    }
}
