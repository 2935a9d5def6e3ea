//! File-backed cart slot.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use comptoir::prelude::{CartStore, CartStoreError};

/// Keeps the persisted cart in a single file.
#[derive(Debug)]
pub struct FileCartStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCartStore {
    /// Slot stored at `path`. Nothing is read or created until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the slot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Result<Option<String>, CartStoreError> {
        let _guard = self.lock.lock().map_err(|_poisoned| CartStoreError::Poisoned)?;

        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, record: &str) -> Result<(), CartStoreError> {
        let _guard = self.lock.lock().map_err(|_poisoned| CartStoreError::Poisoned)?;

        let staged = self.path.with_extension("tmp");

        fs::write(&staged, record)?;
        fs::rename(&staged, &self.path)?;

        Ok(())
    }
}
