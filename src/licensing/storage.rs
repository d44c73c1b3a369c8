use crate::licensing::ports::{ProvidesLicense, WritesLicense};
use crate::licensing::types::{License, LicenseError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Read a JSON document, `None` if the file does not exist.
/// Unparseable contents are reported as [`LicenseError::Corrupt`].
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, LicenseError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| LicenseError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

    let value = serde_json::from_str(&contents)
        .map_err(|e| LicenseError::Corrupt(format!("{}: {}", path.display(), e)))?;

    Ok(Some(value))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), LicenseError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;

    std::fs::write(path, json)
        .map_err(|e| LicenseError::Storage(format!("Failed to write {}: {}", path.display(), e)))
}

pub(crate) fn remove_file(path: &Path) -> Result<(), LicenseError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| {
            LicenseError::Storage(format!("Failed to delete {}: {}", path.display(), e))
        })?;
    }

    Ok(())
}

/// License persistence with an in-memory cache.
///
/// Backed by a JSON file when opened with [`LicenseStore::open`], or purely
/// in memory when created with [`LicenseStore::in_memory`].
#[derive(Debug)]
pub struct LicenseStore {
    path: Option<PathBuf>,
    cache: Mutex<Option<License>>,
}

impl LicenseStore {
    /// Open the store at `path`, loading an existing license if present.
    /// A corrupt file reads as no license; only I/O failures are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LicenseError> {
        let path = path.into();
        let license = match read_json::<License>(&path) {
            Ok(license) => license,
            Err(LicenseError::Corrupt(reason)) => {
                log::warn!("Ignoring unreadable license file {}", reason);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path: Some(path),
            cache: Mutex::new(license),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            cache: Mutex::new(None),
        }
    }

    /// Load the stored license
    pub fn load(&self) -> Option<License> {
        self.lock_cache().clone()
    }

    /// Save a license, replacing any previous one
    pub fn save(&self, license: &License) -> Result<(), LicenseError> {
        if let Some(path) = &self.path {
            write_json(path, license)?;
        }

        *self.lock_cache() = Some(license.clone());
        Ok(())
    }

    /// Delete the stored license. The cache keeps the license if the file
    /// could not be removed.
    pub fn clear(&self) -> Result<(), LicenseError> {
        if let Some(path) = &self.path {
            remove_file(path)?;
        }

        *self.lock_cache() = None;
        Ok(())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<License>> {
        // A poisoned cache still holds a consistent Option
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WritesLicense for LicenseStore {
    fn store(&self, license_code: &str, for_name: &str) {
        if let Err(e) = self.save(&License::new(for_name, license_code)) {
            log::warn!("Could not persist license for {}: {}", for_name, e);
        }
    }

    fn remove_license(&self) {
        if let Err(e) = self.clear() {
            log::warn!("Could not remove stored license: {}", e);
        }
    }
}

impl ProvidesLicense for LicenseStore {
    fn current_license(&self) -> Option<License> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store() {
        let store = LicenseStore::in_memory();
        assert_eq!(store.current_license(), None);

        store.store("CODE-1", "Jane");
        assert_eq!(store.current_license(), Some(License::new("Jane", "CODE-1")));

        store.remove_license();
        assert_eq!(store.current_license(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("license.json");

        let store = LicenseStore::open(&path).unwrap();
        store.store("CODE-2", "John");
        assert!(path.exists());

        let reopened = LicenseStore::open(&path).unwrap();
        assert_eq!(reopened.current_license(), Some(License::new("John", "CODE-2")));
    }

    #[test]
    fn test_remove_license_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("license.json");

        let store = LicenseStore::open(&path).unwrap();
        store.store("CODE-3", "Ann");
        store.remove_license();

        assert!(!path.exists());
        assert_eq!(LicenseStore::open(&path).unwrap().current_license(), None);
    }

    #[test]
    fn test_remove_license_without_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = LicenseStore::open(dir.path().join("missing.json")).unwrap();

        store.remove_license();
        assert_eq!(store.current_license(), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_no_license() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("license.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let store = LicenseStore::open(&path).unwrap();
        assert_eq!(store.current_license(), None);

        store.store("CODE-4", "Ann");
        let reopened = LicenseStore::open(&path).unwrap();
        assert_eq!(reopened.current_license(), Some(License::new("Ann", "CODE-4")));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("license.json");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(LicenseStore::open(&path), Err(LicenseError::Storage(_))));
    }

    #[test]
    fn test_failed_removal_keeps_license() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("license.json");

        let store = LicenseStore::open(&path).unwrap();
        store.store("CODE-5", "Bob");

        // A directory in place of the file cannot be removed with remove_file
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.clear().is_err());
        assert_eq!(store.current_license(), Some(License::new("Bob", "CODE-5")));

        store.remove_license();
        assert_eq!(store.current_license(), Some(License::new("Bob", "CODE-5")));
    }
}
