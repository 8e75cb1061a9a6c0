//! File-backed key/value store with atomic writes.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go through a temp file plus
//! rename so a crash mid-write never leaves a torn value behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::persistence::{KeyValueStore, errors::PersistenceError};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace('/', "_")))
    }
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.persistence.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after write error"
        );
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::IoError { source: e }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::IoError { source: e })?;

        let target = self.key_path(key);
        let temp_file = target.with_extension("json.tmp");

        if let Err(e) = fs::write(&temp_file, value) {
            cleanup_temp_file(&temp_file, &e);
            return Err(PersistenceError::IoError { source: e });
        }

        if let Err(e) = fs::rename(&temp_file, &target) {
            cleanup_temp_file(&temp_file, &e);
            return Err(PersistenceError::IoError { source: e });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get("JOBS").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("JOBS", r#"[{"id":"j1","name":"deploy-node"}]"#).unwrap();
        assert_eq!(
            store.get("JOBS").unwrap().unwrap(),
            r#"[{"id":"j1","name":"deploy-node"}]"#
        );
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("JOBS", "[]").unwrap();
        store.set("JOBS", r#"[{"id":"j2","name":"drain"}]"#).unwrap();

        assert_eq!(
            store.get("JOBS").unwrap().unwrap(),
            r#"[{"id":"j2","name":"drain"}]"#
        );
    }

    #[test]
    fn test_set_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("state").join("store");
        let store = FileStore::new(&nested);

        store.set("JOBS", "[]").unwrap();
        assert!(nested.join("JOBS.json").exists());
    }

    #[test]
    fn test_set_leaves_no_temp_file_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("JOBS", "[]").unwrap();
        assert!(!temp_dir.path().join("JOBS.json.tmp").exists());
        assert!(temp_dir.path().join("JOBS.json").exists());
    }

    #[test]
    fn test_set_cleans_up_temp_file_on_rename_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        // Create a directory where the final file should land to force rename failure
        fs::create_dir_all(temp_dir.path().join("JOBS.json")).unwrap();

        let result = store.set("JOBS", "[]");
        assert!(result.is_err(), "Set should fail when rename fails");
        assert!(
            !temp_dir.path().join("JOBS.json.tmp").exists(),
            "Temp file should be cleaned up after rename failure"
        );
    }
}
