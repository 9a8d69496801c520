//! Chore lifecycle.
//!
//! ```text
//! created --complete--> completed --validate--> validated
//!                           |
//!                           +--reject--> created
//! ```
//!
//! Validation is the only step that awards points. A validated task can no
//! longer be rejected; it can still be deleted like any other task.

use anyhow::Result;
use shared::{timestamp_now, Task, TaskFrequency};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::badge_service::BadgeService;
use crate::domain::commands::task::{CreateTaskCommand, TaskCompletionResult, TaskValidationResult};
use crate::domain::facts;
use crate::domain::ids::unique_id;
use crate::domain::progress_service::ProgressService;
use crate::storage::{StorageService, TaskPatch};

pub const DEFAULT_TASK_POINTS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Task points must be positive")]
    NonPositivePoints,
    #[error("Child not found: {0}")]
    UnknownChild(String),
    #[error("Task not found: {0}")]
    NotFound(String),
    #[error("Task {0} is already completed")]
    AlreadyCompleted(String),
    #[error("Task {0} has not been completed yet")]
    NotCompleted(String),
    #[error("Task {0} is already validated")]
    AlreadyValidated(String),
    #[error("Task {0} could not be saved")]
    NotSaved(String),
}

/// Service for creating chores and moving them through their lifecycle
#[derive(Clone)]
pub struct TaskService {
    storage: StorageService,
    progress_service: ProgressService,
    badge_service: BadgeService,
}

impl TaskService {
    /// Create a new TaskService
    pub fn new(storage: StorageService, progress_service: ProgressService, badge_service: BadgeService) -> Self {
        Self {
            storage,
            progress_service,
            badge_service,
        }
    }

    /// Create a chore for one child
    pub async fn create_task(&self, command: CreateTaskCommand) -> Result<Task> {
        info!("Creating task '{}' for child {}", command.title, command.child_id);

        let title = command.title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle.into());
        }

        let points = command.points.unwrap_or(DEFAULT_TASK_POINTS);
        if points == 0 {
            return Err(TaskError::NonPositivePoints.into());
        }

        let is_known_child = self
            .storage
            .get_users()
            .await
            .iter()
            .any(|user| user.id == command.child_id && user.is_child());
        if !is_known_child {
            return Err(TaskError::UnknownChild(command.child_id).into());
        }

        let description = command
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let existing = self.storage.get_tasks().await;
        let task = Task {
            id: unique_id(Task::generate_id, |id| existing.iter().any(|t| t.id == id)),
            title: title.to_string(),
            description,
            points,
            frequency: command.frequency.unwrap_or(TaskFrequency::Daily),
            child_id: command.child_id,
            completed: false,
            validated: false,
            completed_at: None,
            validated_at: None,
            created_at: timestamp_now(),
        };

        if !self.storage.add_task(&task).await {
            warn!("Task {} was not saved", task.id);
            return Err(TaskError::NotSaved(task.id).into());
        }

        info!("Created task {} worth {} points", task.id, task.points);
        Ok(task)
    }

    pub async fn find_task(&self, task_id: &str) -> Option<Task> {
        self.storage.get_tasks().await.into_iter().find(|t| t.id == task_id)
    }

    /// All tasks owned by a child, in creation order
    pub async fn tasks_for_child(&self, child_id: &str) -> Vec<Task> {
        self.storage
            .get_tasks()
            .await
            .into_iter()
            .filter(|t| t.child_id == child_id)
            .collect()
    }

    /// Child marks a task as done and gets a dino fact as a reward
    pub async fn complete_task(&self, task_id: &str) -> Result<TaskCompletionResult> {
        info!("Completing task: {}", task_id);

        let task = self.require_task(task_id).await?;
        if task.completed {
            return Err(TaskError::AlreadyCompleted(task_id.to_string()).into());
        }

        let task = self
            .apply_patch(task, TaskPatch::mark_completed(timestamp_now()))
            .await?;

        Ok(TaskCompletionResult {
            task,
            fact: facts::random_fact(),
        })
    }

    /// Parent accepts a completed task: the child earns its points and any
    /// badges that brings within reach.
    pub async fn validate_task(&self, task_id: &str) -> Result<TaskValidationResult> {
        info!("Validating task: {}", task_id);

        let task = self.require_task(task_id).await?;
        if task.validated {
            return Err(TaskError::AlreadyValidated(task_id.to_string()).into());
        }
        if !task.completed {
            return Err(TaskError::NotCompleted(task_id.to_string()).into());
        }

        let task = self
            .apply_patch(task, TaskPatch::mark_validated(timestamp_now()))
            .await?;

        let progress = self
            .progress_service
            .award_points(&task.child_id, task.points)
            .await;

        let validated_count = self
            .tasks_for_child(&task.child_id)
            .await
            .iter()
            .filter(|t| t.validated)
            .count() as u32;
        let newly_unlocked_badges = self
            .badge_service
            .evaluate(&task.child_id, progress.total_points, validated_count)
            .await;

        Ok(TaskValidationResult {
            task,
            progress,
            newly_unlocked_badges,
        })
    }

    /// Parent sends a completed task back to the child
    pub async fn reject_task(&self, task_id: &str) -> Result<Task> {
        info!("Rejecting task: {}", task_id);

        let task = self.require_task(task_id).await?;
        if task.validated {
            return Err(TaskError::AlreadyValidated(task_id.to_string()).into());
        }
        if !task.completed {
            return Err(TaskError::NotCompleted(task_id.to_string()).into());
        }

        self.apply_patch(task, TaskPatch::reopen()).await
    }

    /// Remove a task. Unknown ids are ignored.
    pub async fn delete_task(&self, task_id: &str) -> bool {
        info!("Deleting task: {}", task_id);

        let deleted = self.storage.delete_task(task_id).await;
        if !deleted {
            info!("No task {} to delete", task_id);
        }
        deleted
    }

    async fn require_task(&self, task_id: &str) -> Result<Task, TaskError> {
        self.find_task(task_id)
            .await
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
    }

    async fn apply_patch(&self, mut task: Task, patch: TaskPatch) -> Result<Task> {
        if !self.storage.update_task(&task.id, patch.clone()).await {
            warn!("Update of task {} was not saved", task.id);
            return Err(TaskError::NotSaved(task.id).into());
        }
        patch.apply(&mut task);
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::TestEnvironment;
    use crate::storage::{KeyValueStore, MemoryStore, StorageService};
    use shared::{Stage, User, UserRole};
    use std::sync::Arc;

    async fn setup_test(env: &TestEnvironment) -> (TaskService, User) {
        let progress_service = ProgressService::new(env.storage.clone());
        let badge_service = BadgeService::new(env.storage.clone());
        let service = TaskService::new(env.storage.clone(), progress_service, badge_service);

        let child = User {
            id: "user-1700000000001".to_string(),
            display_name: "Léo".to_string(),
            role: UserRole::Child,
            parent_id: None,
            created_at: "2025-01-20T10:00:00.000Z".to_string(),
        };
        env.storage.add_user(&child).await;

        (service, child)
    }

    fn command(child: &User, title: &str, points: Option<u32>) -> CreateTaskCommand {
        CreateTaskCommand {
            child_id: child.id.clone(),
            title: title.to_string(),
            description: None,
            points,
            frequency: None,
        }
    }

    fn task_error(error: &anyhow::Error) -> Option<&TaskError> {
        error.downcast_ref::<TaskError>()
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;

        let task = service
            .create_task(CreateTaskCommand {
                description: Some("   ".to_string()),
                ..command(&child, "  Ranger sa chambre ", None)
            })
            .await
            .expect("Failed to create task");

        assert_eq!(task.title, "Ranger sa chambre");
        assert_eq!(task.points, DEFAULT_TASK_POINTS);
        assert_eq!(task.frequency, TaskFrequency::Daily);
        assert_eq!(task.description, None);
        assert!(!task.completed && !task.validated);
        assert_eq!(service.tasks_for_child(&child.id).await, vec![task]);
    }

    #[tokio::test]
    async fn test_create_task_validation() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;

        let error = service.create_task(command(&child, " ", None)).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::EmptyTitle));

        let error = service.create_task(command(&child, "Vaisselle", Some(0))).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::NonPositivePoints));

        let stranger = User {
            id: "user-404".to_string(),
            ..child.clone()
        };
        let error = service.create_task(command(&stranger, "Vaisselle", None)).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::UnknownChild("user-404".to_string())));

        assert!(env.storage.get_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn test_complete_task_returns_fact() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();

        let result = service.complete_task(&task.id).await.expect("Failed to complete task");
        assert!(result.task.completed);
        assert!(result.task.completed_at.is_some());
        assert!(!result.fact.is_empty());

        let stored = service.find_task(&task.id).await.unwrap();
        assert_eq!(stored, result.task);

        let error = service.complete_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::AlreadyCompleted(task.id.clone())));
    }

    #[tokio::test]
    async fn test_completion_alone_awards_nothing() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();

        service.complete_task(&task.id).await.unwrap();

        let progress = service.progress_service.get_or_create(&child.id).await;
        assert_eq!(progress.total_points, 0);
        assert_eq!(progress.stage, Stage::Egg);
    }

    #[tokio::test]
    async fn test_validate_task_awards_points_and_badge() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();
        service.complete_task(&task.id).await.unwrap();

        let result = service.validate_task(&task.id).await.expect("Failed to validate task");

        assert!(result.task.validated);
        assert!(result.task.validated_at.is_some());
        assert_eq!(result.progress.total_points, 5);
        assert_eq!(result.progress.level, 1);
        assert_eq!(result.progress.stage, Stage::Egg);
        let ids: Vec<_> = result.newly_unlocked_badges.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["badge-1"]);

        let error = service.validate_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::AlreadyValidated(task.id.clone())));

        let progress = service.progress_service.find_progress(&child.id).await.unwrap();
        assert_eq!(progress.total_points, 5);
    }

    #[tokio::test]
    async fn test_validate_requires_completion() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();

        let error = service.validate_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::NotCompleted(task.id.clone())));
        assert!(service.progress_service.find_progress(&child.id).await.is_none());
    }

    #[tokio::test]
    async fn test_reject_rolls_back_completion() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();
        service.complete_task(&task.id).await.unwrap();

        let rejected = service.reject_task(&task.id).await.expect("Failed to reject task");
        assert!(!rejected.completed);
        assert_eq!(rejected.completed_at, None);
        assert_eq!(service.find_task(&task.id).await.unwrap(), task);

        let error = service.reject_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::NotCompleted(task.id.clone())));
    }

    #[tokio::test]
    async fn test_validated_task_cannot_be_rejected() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();
        service.complete_task(&task.id).await.unwrap();
        service.validate_task(&task.id).await.unwrap();

        let error = service.reject_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::AlreadyValidated(task.id.clone())));
        assert!(service.find_task(&task.id).await.unwrap().validated);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let env = TestEnvironment::new();
        let (service, child) = setup_test(&env).await;
        let task = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap();

        assert!(!service.delete_task("missing-id").await);
        assert_eq!(service.tasks_for_child(&child.id).await.len(), 1);

        assert!(service.delete_task(&task.id).await);
        assert!(service.tasks_for_child(&child.id).await.is_empty());

        let error = service.complete_task(&task.id).await.unwrap_err();
        assert_eq!(task_error(&error), Some(&TaskError::NotFound(task.id.clone())));
    }

    #[tokio::test]
    async fn test_create_task_fails_when_not_stored() {
        let store = MemoryStore::new();
        let storage = StorageService::new(Arc::new(store.clone()));
        let progress_service = ProgressService::new(storage.clone());
        let badge_service = BadgeService::new(storage.clone());
        let service = TaskService::new(storage.clone(), progress_service, badge_service);
        let child = User {
            id: "user-1700000000001".to_string(),
            display_name: "Léo".to_string(),
            role: UserRole::Child,
            parent_id: None,
            created_at: "2025-01-20T10:00:00.000Z".to_string(),
        };
        storage.add_user(&child).await;
        store.set_item("@dinoduty/tasks", "{not json").await.unwrap();

        let error = service.create_task(command(&child, "Vaisselle", Some(5))).await.unwrap_err();

        assert!(matches!(task_error(&error), Some(TaskError::NotSaved(_))));
        assert_eq!(
            store.get_item("@dinoduty/tasks").await.unwrap().as_deref(),
            Some("{not json")
        );
    }
}
