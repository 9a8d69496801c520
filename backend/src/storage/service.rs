//! # Storage Service
//!
//! Facade over the five persisted collections (users, tasks, dino progress,
//! badge catalog, per-child unlocked badges) plus the current session user.
//!
//! Each collection is one JSON document under one key and every mutation is a
//! read-modify-write of the whole document. There is exactly one writer at a
//! time, so no locking happens here.
//!
//! ## Failure handling
//!
//! Public methods never return errors. A storage or decoding failure is logged
//! and replaced by a safe value: an empty collection, `None`, `false`, or a
//! skipped write. Mutations read the collection strictly first, so a corrupt
//! document is left in place rather than overwritten with an empty list.
//!
//! ## Not-found handling
//!
//! `update_user` and `update_task` do nothing when the id is unknown.
//! `update_dino_progress` creates the record instead (upsert).

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{format_timestamp, Badge, DinoProgress, Task, User};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::ids::unique_id;

use super::defaults::default_badges;
use super::error::StorageError;
use super::keys;
use super::patches::{ProgressPatch, TaskPatch, UserPatch};
use super::traits::KeyValueStore;

#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn KeyValueStore>,
}

impl StorageService {
    /// Create a new StorageService on top of any key-value backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get_item(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set_item(key, &raw).await
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        Ok(self.read_json::<Vec<T>>(key).await?.unwrap_or_default())
    }

    // ---------------------------------------------------------------------
    // Current session user
    // ---------------------------------------------------------------------

    pub async fn get_current_user(&self) -> Option<User> {
        match self.read_json::<Option<User>>(keys::CURRENT_USER).await {
            Ok(user) => user.flatten(),
            Err(e) => {
                error!("Error getting current user: {}", e);
                None
            }
        }
    }

    /// Persist the session user, or forget it when `user` is `None`
    pub async fn set_current_user(&self, user: Option<&User>) {
        let result = match user {
            Some(user) => self.write_json(keys::CURRENT_USER, user).await,
            None => self.store.remove_item(keys::CURRENT_USER).await,
        };

        if let Err(e) = result {
            error!("Error setting current user: {}", e);
        }
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    pub async fn get_users(&self) -> Vec<User> {
        match self.read_list(keys::USERS).await {
            Ok(users) => users,
            Err(e) => {
                error!("Error getting users: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_add_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users: Vec<User> = self.read_list(keys::USERS).await?;
        users.push(user.clone());
        self.write_json(keys::USERS, &users).await
    }

    /// Append `user` to the users collection. Returns whether it was stored.
    pub async fn add_user(&self, user: &User) -> bool {
        match self.try_add_user(user).await {
            Ok(()) => {
                debug!("Stored user {}", user.id);
                true
            }
            Err(e) => {
                error!("Error adding user: {}", e);
                false
            }
        }
    }

    async fn try_update_user(&self, user_id: &str, patch: UserPatch) -> Result<bool, StorageError> {
        let mut users: Vec<User> = self.read_list(keys::USERS).await?;
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            debug!("No user {} to update", user_id);
            return Ok(false);
        };

        patch.apply(user);
        self.write_json(keys::USERS, &users).await?;
        Ok(true)
    }

    /// Merge `patch` into the user with `user_id`. Returns whether a record changed.
    pub async fn update_user(&self, user_id: &str, patch: UserPatch) -> bool {
        self.try_update_user(user_id, patch).await.unwrap_or_else(|e| {
            error!("Error updating user: {}", e);
            false
        })
    }

    // ---------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------

    pub async fn get_tasks(&self) -> Vec<Task> {
        match self.read_list(keys::TASKS).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("Error getting tasks: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_add_task(&self, task: &Task) -> Result<(), StorageError> {
        let mut tasks: Vec<Task> = self.read_list(keys::TASKS).await?;
        tasks.push(task.clone());
        self.write_json(keys::TASKS, &tasks).await
    }

    /// Append `task` to the tasks collection. Returns whether it was stored.
    pub async fn add_task(&self, task: &Task) -> bool {
        match self.try_add_task(task).await {
            Ok(()) => {
                debug!("Stored task {}", task.id);
                true
            }
            Err(e) => {
                error!("Error adding task: {}", e);
                false
            }
        }
    }

    async fn try_update_task(&self, task_id: &str, patch: TaskPatch) -> Result<bool, StorageError> {
        let mut tasks: Vec<Task> = self.read_list(keys::TASKS).await?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            debug!("No task {} to update", task_id);
            return Ok(false);
        };

        let mut merged = task.clone();
        patch.apply(&mut merged);
        if merged.validated && !merged.completed {
            warn!("Refusing update of task {}: validated tasks must stay completed", task_id);
            return Ok(false);
        }

        *task = merged;
        self.write_json(keys::TASKS, &tasks).await?;
        Ok(true)
    }

    /// Merge `patch` into the task with `task_id`. Returns whether a record changed.
    ///
    /// A patch that would leave the task validated but not completed is refused.
    pub async fn update_task(&self, task_id: &str, patch: TaskPatch) -> bool {
        self.try_update_task(task_id, patch).await.unwrap_or_else(|e| {
            error!("Error updating task: {}", e);
            false
        })
    }

    async fn try_delete_task(&self, task_id: &str) -> Result<bool, StorageError> {
        let tasks: Vec<Task> = self.read_list(keys::TASKS).await?;
        let before = tasks.len();
        let remaining: Vec<Task> = tasks.into_iter().filter(|t| t.id != task_id).collect();

        self.write_json(keys::TASKS, &remaining).await?;
        Ok(remaining.len() != before)
    }

    /// Remove a task. Returns whether a record was removed.
    pub async fn delete_task(&self, task_id: &str) -> bool {
        self.try_delete_task(task_id).await.unwrap_or_else(|e| {
            error!("Error deleting task: {}", e);
            false
        })
    }

    // ---------------------------------------------------------------------
    // Dino progress
    // ---------------------------------------------------------------------

    pub async fn get_dino_progress(&self) -> Vec<DinoProgress> {
        match self.read_list(keys::DINO_PROGRESS).await {
            Ok(progress) => progress,
            Err(e) => {
                error!("Error getting dino progress: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_update_dino_progress(&self, child_id: &str, patch: ProgressPatch) -> Result<DinoProgress, StorageError> {
        let mut progress_list: Vec<DinoProgress> = self.read_list(keys::DINO_PROGRESS).await?;
        let now = Utc::now();

        let index = match progress_list.iter().position(|p| p.child_id == child_id) {
            Some(index) => index,
            None => {
                info!("Creating dino progress for child {}", child_id);
                let mut created = DinoProgress::new_for_child(child_id, now);
                created.id = unique_id(DinoProgress::generate_id, |id| {
                    progress_list.iter().any(|p| p.id == id)
                });
                progress_list.push(created);
                progress_list.len() - 1
            }
        };

        patch.apply(&mut progress_list[index], format_timestamp(now));
        let updated = progress_list[index].clone();

        self.write_json(keys::DINO_PROGRESS, &progress_list).await?;
        Ok(updated)
    }

    /// Merge `patch` into the child's progress record, creating it with
    /// defaults first when the child has none. Returns the stored record.
    pub async fn update_dino_progress(&self, child_id: &str, patch: ProgressPatch) -> Option<DinoProgress> {
        match self.try_update_dino_progress(child_id, patch).await {
            Ok(progress) => Some(progress),
            Err(e) => {
                error!("Error updating dino progress: {}", e);
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Badges
    // ---------------------------------------------------------------------

    /// Read the badge catalog, seeding it with the defaults on first use
    pub async fn get_badges(&self) -> Vec<Badge> {
        match self.read_json::<Vec<Badge>>(keys::BADGES).await {
            Ok(Some(badges)) => badges,
            Ok(None) => {
                let badges = default_badges();
                match self.write_json(keys::BADGES, &badges).await {
                    Ok(()) => info!("Seeded badge catalog with {} badges", badges.len()),
                    Err(e) => error!("Error seeding badges: {}", e),
                }
                badges
            }
            Err(e) => {
                error!("Error getting badges: {}", e);
                default_badges()
            }
        }
    }

    pub async fn get_unlocked_badges(&self, child_id: &str) -> Vec<String> {
        match self.read_list(&keys::unlocked_badges(child_id)).await {
            Ok(badge_ids) => badge_ids,
            Err(e) => {
                error!("Error getting unlocked badges: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_unlock_badge(&self, child_id: &str, badge_id: &str) -> Result<bool, StorageError> {
        let key = keys::unlocked_badges(child_id);
        let mut unlocked: Vec<String> = self.read_list(&key).await?;
        if unlocked.iter().any(|id| id == badge_id) {
            return Ok(false);
        }

        unlocked.push(badge_id.to_string());
        self.write_json(&key, &unlocked).await?;
        Ok(true)
    }

    /// Add `badge_id` to the child's unlocked set. Returns whether it was new.
    pub async fn unlock_badge(&self, child_id: &str, badge_id: &str) -> bool {
        self.try_unlock_badge(child_id, badge_id).await.unwrap_or_else(|e| {
            error!("Error unlocking badge: {}", e);
            false
        })
    }

    // ---------------------------------------------------------------------
    // Maintenance
    // ---------------------------------------------------------------------

    /// Remove every DinoDuty key, including each child's unlocked badges
    pub async fn clear_all(&self) {
        let mut doomed: Vec<String> = keys::ALL.iter().map(|k| k.to_string()).collect();

        match self.store.all_keys().await {
            Ok(existing) => doomed.extend(
                existing
                    .into_iter()
                    .filter(|key| keys::is_unlocked_badges_key(key)),
            ),
            Err(e) => warn!("Could not list per-child keys while clearing: {}", e),
        }

        match self.store.multi_remove(&doomed).await {
            Ok(()) => info!("Cleared {} storage keys", doomed.len()),
            Err(e) => error!("Error clearing storage: {}", e),
        }
    }
}
