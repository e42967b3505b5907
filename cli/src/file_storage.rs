//! File-backed key-value store for the CLI.
//!
//! The whole store is one JSON object of string values, re-read on every
//! access and rewritten on every mutation, so several CLI invocations share
//! state the way browser tabs share `localStorage`. Rewrites go through a
//! temp file in the same directory and a rename, and a corrupt file is
//! replaced by the next write instead of blocking it.

#[cfg(test)]
#[path = "file_storage_test.rs"]
mod file_storage_test;

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use careermap_client::error::StorageError;
use careermap_client::util::storage::KeyValueStore;

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

fn io_error(err: &std::io::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn parse(raw: &str) -> Result<Entries, serde_json::Error> {
    if raw.trim().is_empty() { Ok(Entries::new()) } else { serde_json::from_str(raw) }
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; a missing file reads as empty.
    fn read_raw(&self) -> Result<String, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(io_error(&e)),
        }
    }

    fn load(&self) -> Result<Entries, StorageError> {
        parse(&self.read_raw()?).map_err(|e| StorageError::Backend(format!("corrupt state file: {e}")))
    }

    /// Current entries for a mutation, plus whether the file must be
    /// rewritten regardless. A corrupt file counts as empty.
    fn load_for_write(&self) -> Result<(Entries, bool), StorageError> {
        match parse(&self.read_raw()?) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "overwriting corrupt state file");
                Ok((Entries::new(), true))
            }
        }
    }

    fn store(&self, entries: &Entries) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| io_error(&e))?;
        let raw = serde_json::to_string_pretty(entries)?;
        let mut file = tempfile::NamedTempFile::new_in(parent).map_err(|e| io_error(&e))?;
        file.write_all(raw.as_bytes()).map_err(|e| io_error(&e))?;
        file.as_file().sync_all().map_err(|e| io_error(&e))?;
        file.persist(&self.path).map_err(|e| io_error(&e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.store(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let (mut entries, corrupt) = self.load_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.store(&entries)?;
        }
        Ok(())
    }
}
