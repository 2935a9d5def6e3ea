//! Cart Stores
//!
//! The durable slot a cart writes itself to. A store only holds the raw serialized record; the
//! cart decides what it means.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Contents written to the slot when it is reset.
pub const EMPTY_RECORD: &str = "{}";

/// Errors raised by a cart store.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The slot could not be read or written.
    #[error("cart storage unavailable")]
    Io(#[from] std::io::Error),

    /// Another user of the slot panicked while holding it.
    #[error("cart storage lock poisoned")]
    Poisoned,
}

/// A single named durable slot holding the persisted cart.
///
/// Implementations serialize access to the slot, so a cart's read-modify-write never interleaves
/// with another one.
pub trait CartStore {
    /// Reads the slot, `None` when nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if the slot cannot be read.
    fn load(&self) -> Result<Option<String>, CartStoreError>;

    /// Overwrites the slot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if the slot cannot be written.
    fn save(&self, record: &str) -> Result<(), CartStoreError>;

    /// Resets the slot to an empty record.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStoreError`] if the slot cannot be written.
    fn clear(&self) -> Result<(), CartStoreError> {
        self.save(EMPTY_RECORD)
    }
}

/// In-memory slot. Clones share the same slot, which is how a reload is simulated.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStore {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot already holding `record`.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record.into()))),
        }
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<String>, CartStoreError> {
        let slot = self.slot.lock().map_err(|_poisoned| CartStoreError::Poisoned)?;

        Ok(slot.clone())
    }

    fn save(&self, record: &str) -> Result<(), CartStoreError> {
        let mut slot = self.slot.lock().map_err(|_poisoned| CartStoreError::Poisoned)?;

        *slot = Some(record.to_string());

        Ok(())
    }
}
