//! # DinoDuty Backend
//!
//! Storage and domain services for the DinoDuty chore tracker. Children
//! complete chores, parents validate them, and validated points grow the
//! child's dinosaur through five stages.
//!
//! ```text
//! Backend
//!  ├── domain   (sessions, users, tasks, progress, badges, dashboards)
//!  └── storage  (StorageService over a KeyValueStore: FileStore / MemoryStore)
//! ```
//!
//! A UI layer builds one [`Backend`] at startup and calls its services.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

pub use config::BackendConfig;
pub use domain::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageService};

/// Main backend struct that wires every service to one store
#[derive(Clone)]
pub struct Backend {
    pub storage: StorageService,
    pub session_service: domain::SessionService,
    pub user_service: domain::UserService,
    pub task_service: domain::TaskService,
    pub progress_service: domain::ProgressService,
    pub badge_service: domain::BadgeService,
    pub dashboard_service: domain::DashboardService,
}

impl Backend {
    /// Create a new backend instance on top of any key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let storage = StorageService::new(store);

        let session_service = domain::SessionService::new(storage.clone());
        let progress_service = domain::ProgressService::new(storage.clone());
        let badge_service = domain::BadgeService::new(storage.clone());
        let user_service = domain::UserService::new(
            storage.clone(),
            session_service.clone(),
            progress_service.clone(),
        );
        let task_service = domain::TaskService::new(
            storage.clone(),
            progress_service.clone(),
            badge_service.clone(),
        );
        let dashboard_service = domain::DashboardService::new(
            user_service.clone(),
            task_service.clone(),
            progress_service.clone(),
            badge_service.clone(),
        );

        Backend {
            storage,
            session_service,
            user_service,
            task_service,
            progress_service,
            badge_service,
            dashboard_service,
        }
    }

    /// File-backed backend rooted at the configured data directory
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        info!("Opening DinoDuty data directory {:?}", config.data_directory);
        let store = FileStore::new(&config.data_directory)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Backend that keeps everything in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Wipe all persisted data and sign out
    pub async fn reset(&self, session: &mut Session) {
        info!("Resetting all DinoDuty data");
        self.storage.clear_all().await;
        self.session_service.logout(session).await;
    }
}
