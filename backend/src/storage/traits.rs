//! # Storage Traits
//!
//! The key-value abstraction every collection is persisted through. Values are
//! opaque strings (JSON documents in practice); the store knows nothing about
//! users, tasks or progress.

use async_trait::async_trait;

use super::error::StorageError;

/// Trait defining the interface for a string key-value backend
///
/// Implementations must treat a missing key as `Ok(None)`, never as an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key succeeds
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// List every key currently present
    async fn all_keys(&self) -> Result<Vec<String>, StorageError>;

    /// Remove several keys, stopping at the first failure
    async fn multi_remove(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            self.remove_item(key).await?;
        }
        Ok(())
    }
}
