use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::error::StorageError;
use super::traits::KeyValueStore;

/// In-process [`KeyValueStore`] for tests and throwaway sessions.
///
/// Clones share the same map. `set_unavailable(true)` makes every call fail
/// with [`StorageError::Unavailable`]; `set_read_only(true)` only fails writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<BTreeMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        self.check_available()?;
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        Ok(())
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(io::Error::new(
                io::ErrorKind::Other,
                "memory store switched off",
            )));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.items.lock().map_err(|_| {
            StorageError::Unavailable(io::Error::new(io::ErrorKind::Other, "memory store poisoned"))
        })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }

    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        self.check_available()?;
        Ok(self.lock()?.keys().cloned().collect())
    }
}
