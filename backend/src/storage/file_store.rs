//! # File Store
//!
//! Disk-backed [`KeyValueStore`]. Every key lives in its own JSON file inside a
//! single data directory:
//!
//! ```text
//! DinoDuty/
//! ├── %40dinoduty%2Fcurrent_user.json
//! ├── %40dinoduty%2Fusers.json
//! ├── %40dinoduty%2Ftasks.json
//! ├── %40dinoduty%2Fdino_progress.json
//! ├── %40dinoduty%2Fbadges.json
//! └── %40dinoduty%2Funlocked_badges_user-1700000000000.json
//! ```
//!
//! File names are the percent-encoded key, so the original key can be recovered
//! when listing. Writes go through a temp file and a rename.

use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::StorageError;
use super::traits::KeyValueStore;

const FILE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// FileStore maps keys to files under a base directory
#[derive(Clone, Debug)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Create a new file store, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file that holds `key`
    pub fn file_path_for_key(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let file_name = format!("{}.{}", urlencoding::encode(key), FILE_EXTENSION);
        Ok(self.base_directory.join(file_name))
    }

    fn key_from_file_name(file_name: &str) -> Option<String> {
        let encoded = file_name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
        urlencoding::decode(encoded).ok().map(|key| key.into_owned())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.file_path_for_key(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.file_path_for_key(key)?;
        let temp_path = path.with_extension(TEMP_EXTENSION);

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Wrote {} bytes for key {}", value.len(), key);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.file_path_for_key(key)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed key {}", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(key) = Self::key_from_file_name(file_name) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}
