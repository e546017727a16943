//! Directory-backed medium.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueMedium, StoreError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temporary file first and are moved into place
/// with a rename, so a reader never sees a half-written collection.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open (creating if needed) the directory at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|err| io_error(key, err))?;
        fs::rename(&tmp, &path).map_err(|err| io_error(key, err))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("store");
        let medium = FileMedium::open(&dir).unwrap();
        assert!(medium.dir().is_dir());
    }

    #[test]
    fn test_get_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let medium = FileMedium::open(tmp.path()).unwrap();
        assert_eq!(medium.get("bazarlink_users").unwrap(), None);
    }

    #[test]
    fn test_set_writes_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let medium = FileMedium::open(tmp.path()).unwrap();
        medium.set("bazarlink_users", "[]").unwrap();

        let on_disk = fs::read_to_string(tmp.path().join("bazarlink_users.json")).unwrap();
        assert_eq!(on_disk, "[]");
        assert!(!tmp.path().join(".bazarlink_users.json.tmp").exists());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let medium = FileMedium::open(tmp.path()).unwrap();
        medium.remove("bazarlink_current_user").unwrap();
    }

    #[test]
    fn test_records_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let store = RecordStore::new(FileMedium::open(tmp.path()).unwrap());
            store.write("numbers", &[1_u32, 2, 3]).unwrap();
        }
        let store = RecordStore::new(FileMedium::open(tmp.path()).unwrap());
        assert_eq!(store.read::<u32>("numbers").unwrap(), vec![1, 2, 3]);
    }
}
