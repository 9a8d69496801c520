//! Test utilities for file-backed storage.
//!
//! Each environment owns a temporary directory that is removed when the
//! environment is dropped, even if the test panics.

use std::path::Path;
use std::sync::Arc;
use tempfile::{Builder, TempDir};

use super::file_store::FileStore;
use super::service::StorageService;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub store: FileStore,
    pub storage: StorageService,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = Builder::new()
            .prefix("dinoduty_test_")
            .tempdir()
            .expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path()).expect("Failed to create file store");
        let storage = StorageService::new(Arc::new(store.clone()));

        Self {
            _temp_dir: temp_dir,
            store,
            storage,
        }
    }

    pub fn base_directory(&self) -> &Path {
        self.store.base_directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_starts_empty() {
        let env = TestEnvironment::new();

        assert!(env.base_directory().exists());
        assert!(env.storage.get_users().await.is_empty());
    }
}
