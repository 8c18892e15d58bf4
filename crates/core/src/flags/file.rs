//! Flag store persisted to a single JSON file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::FlagError;
use super::memory::MemoryFlagStore;
use super::store::{FlagScope, FlagStore};

/// Flag store loaded from and written back to a pretty-printed JSON file.
///
/// Edits stay in memory until [`JsonFileFlagStore::flush`].
#[derive(Debug)]
pub struct JsonFileFlagStore {
    path: PathBuf,
    inner: MemoryFlagStore,
    dirty: bool,
}

impl JsonFileFlagStore {
    /// Opens a store file. A missing file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FlagError> {
        let path = path.as_ref().to_path_buf();
        let inner = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| FlagError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "flag store file missing, starting empty");
                MemoryFlagStore::new()
            }
            Err(err) => return Err(FlagError::io(path, err)),
        };
        Ok(Self {
            path,
            inner,
            dirty: false,
        })
    }

    /// Store file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if there are unwritten edits.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes pending edits to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be written.
    pub fn flush(&mut self) -> Result<(), FlagError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| FlagError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.inner).map_err(|source| {
            FlagError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|e| FlagError::io(&self.path, e))?;
        self.dirty = false;
        info!(path = %self.path.display(), "flag store written");
        Ok(())
    }
}

impl FlagStore for JsonFileFlagStore {
    fn get_flag(&self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError> {
        self.inner.get_flag(scope, key)
    }

    fn set_flag(&mut self, scope: &FlagScope, key: &str, value: Value) -> Result<(), FlagError> {
        self.inner.set_flag(scope, key, value)?;
        self.dirty = true;
        Ok(())
    }

    fn unset_flag(&mut self, scope: &FlagScope, key: &str) -> Result<Option<Value>, FlagError> {
        let removed = self.inner.unset_flag(scope, key)?;
        if removed.is_some() {
            self.dirty = true;
        }
        Ok(removed)
    }

    fn flags(&self, scope: &FlagScope) -> Result<Map<String, Value>, FlagError> {
        self.inner.flags(scope)
    }
}
