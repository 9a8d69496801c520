//! # Storage Module
//!
//! Persistence for users, tasks, dino progress and badges.
//!
//! Everything is stored as JSON documents in a string key-value store. The
//! [`KeyValueStore`] trait hides the backend: [`FileStore`] keeps one file per
//! key on disk, [`MemoryStore`] keeps everything in process for tests.
//!
//! [`StorageService`] is the only way the domain layer touches persisted data.
//! It never propagates storage errors; see its module docs for the fail-soft
//! rules.

pub mod defaults;
pub mod error;
pub mod file_store;
pub mod keys;
pub mod memory_store;
pub mod patches;
pub mod service;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use defaults::default_badges;
pub use error::StorageError;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use patches::{ProgressPatch, TaskPatch, UserPatch};
pub use service::StorageService;
pub use traits::KeyValueStore;
