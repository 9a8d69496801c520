//! End-to-end chore flow against the file-backed store.

use dinoduty_backend::domain::commands::task::CreateTaskCommand;
use dinoduty_backend::domain::commands::user::CreateUserCommand;
use dinoduty_backend::domain::{Dashboard, Session};
use dinoduty_backend::{Backend, BackendConfig};
use shared::{Stage, Task, User, UserRole};
use tempfile::TempDir;

fn open_backend(temp_dir: &TempDir) -> Backend {
    let config = BackendConfig {
        data_directory: temp_dir.path().join("data"),
        ..BackendConfig::default()
    };
    Backend::from_config(&config).expect("Failed to open backend")
}

async fn create_user(backend: &Backend, session: &mut Session, name: &str, role: UserRole) -> User {
    backend
        .user_service
        .create_user(
            session,
            CreateUserCommand {
                display_name: name.to_string(),
                role,
                parent_id: None,
            },
        )
        .await
        .expect("Failed to create user")
}

async fn create_task(backend: &Backend, child: &User, title: &str, points: u32) -> Task {
    backend
        .task_service
        .create_task(CreateTaskCommand {
            child_id: child.id.clone(),
            title: title.to_string(),
            description: None,
            points: Some(points),
            frequency: None,
        })
        .await
        .expect("Failed to create task")
}

#[tokio::test]
async fn points_only_arrive_on_validation() {
    let temp_dir = TempDir::new().unwrap();
    let backend = open_backend(&temp_dir);
    let mut session = Session::anonymous();
    let child = create_user(&backend, &mut session, "Léo", UserRole::Child).await;
    let task = create_task(&backend, &child, "Vaisselle", 5).await;

    let progress = backend.progress_service.get_or_create(&child.id).await;
    assert_eq!(progress.total_points, 0);
    assert_eq!(progress.stage, Stage::Egg);

    let completion = backend.task_service.complete_task(&task.id).await.unwrap();
    assert!(!completion.fact.is_empty());
    let progress = backend.progress_service.get_or_create(&child.id).await;
    assert_eq!(progress.total_points, 0);

    let validation = backend.task_service.validate_task(&task.id).await.unwrap();
    assert_eq!(validation.progress.total_points, 5);
    assert_eq!(validation.progress.level, 1);
    assert_eq!(validation.progress.stage, Stage::Egg);
}

#[tokio::test]
async fn reaching_25_points_hatches_the_egg() {
    let temp_dir = TempDir::new().unwrap();
    let backend = open_backend(&temp_dir);
    let mut session = Session::anonymous();
    let child = create_user(&backend, &mut session, "Zoé", UserRole::Child).await;

    let mut stages = Vec::new();
    for (title, points) in [("Vaisselle", 10), ("Poubelles", 10), ("Lit", 5)] {
        let task = create_task(&backend, &child, title, points).await;
        backend.task_service.complete_task(&task.id).await.unwrap();
        let result = backend.task_service.validate_task(&task.id).await.unwrap();
        stages.push(result.progress.stage);
    }

    assert_eq!(stages, vec![Stage::Egg, Stage::Egg, Stage::Baby]);
    let progress = backend.progress_service.find_progress(&child.id).await.unwrap();
    assert_eq!(progress.total_points, 25);
    assert_eq!(progress.level, 3);
    assert_eq!(progress.stage, Stage::Baby);

    let badges = backend.badge_service.unlocked_badge_ids(&child.id).await;
    assert_eq!(badges, vec!["badge-1".to_string(), "badge-2".to_string()]);
}

#[tokio::test]
async fn deleting_a_missing_task_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let backend = open_backend(&temp_dir);
    let mut session = Session::anonymous();
    let child = create_user(&backend, &mut session, "Léo", UserRole::Child).await;
    create_task(&backend, &child, "Vaisselle", 5).await;
    let before = backend.storage.get_tasks().await;

    assert!(!backend.task_service.delete_task("missing-id").await);

    assert_eq!(backend.storage.get_tasks().await, before);
}

#[tokio::test]
async fn data_survives_reopening_the_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = Session::anonymous();
    let (child, task) = {
        let backend = open_backend(&temp_dir);
        let child = create_user(&backend, &mut session, "Léo", UserRole::Child).await;
        let task = create_task(&backend, &child, "Vaisselle", 5).await;
        backend.task_service.complete_task(&task.id).await.unwrap();
        (child, task)
    };

    let backend = open_backend(&temp_dir);
    let restored = backend.session_service.load().await;
    assert_eq!(restored.current_user(), Some(&child));

    let stored = backend.task_service.find_task(&task.id).await.unwrap();
    assert!(stored.completed);
    assert!(!stored.validated);
}

#[tokio::test]
async fn parent_sees_completed_chores_waiting() {
    let temp_dir = TempDir::new().unwrap();
    let backend = open_backend(&temp_dir);
    let mut session = Session::anonymous();
    let child = create_user(&backend, &mut session, "Léo", UserRole::Child).await;
    let task = create_task(&backend, &child, "Vaisselle", 5).await;
    backend.task_service.complete_task(&task.id).await.unwrap();
    create_user(&backend, &mut session, "Maman", UserRole::Parent).await;

    let Some(Dashboard::Parent(dashboard)) = backend.dashboard_service.for_session(&session).await else {
        panic!("Expected a parent dashboard");
    };
    let selected = dashboard.selected_child.unwrap();
    assert_eq!(selected.child.id, child.id);
    assert_eq!(selected.awaiting_validation.len(), 1);
    assert_eq!(selected.awaiting_validation[0].id, task.id);
}

#[tokio::test]
async fn reset_wipes_everything() {
    let temp_dir = TempDir::new().unwrap();
    let backend = open_backend(&temp_dir);
    let mut session = Session::anonymous();
    let child = create_user(&backend, &mut session, "Léo", UserRole::Child).await;
    let task = create_task(&backend, &child, "Vaisselle", 5).await;
    backend.task_service.complete_task(&task.id).await.unwrap();
    backend.task_service.validate_task(&task.id).await.unwrap();

    backend.reset(&mut session).await;

    assert!(!session.is_signed_in());
    assert!(backend.user_service.list_users().await.is_empty());
    assert!(backend.storage.get_tasks().await.is_empty());
    assert!(backend.storage.get_dino_progress().await.is_empty());
    assert!(backend.badge_service.unlocked_badge_ids(&child.id).await.is_empty());
    assert!(!backend.session_service.load().await.is_signed_in());
}
