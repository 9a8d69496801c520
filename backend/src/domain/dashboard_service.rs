//! Read models for the two home screens.
//!
//! Children see their own chores and dino. Parents pick one of the children
//! (the first one by default) and see what is waiting for their approval.

use shared::{Badge, Task, User, UserRole};
use tracing::info;

use crate::domain::badge_service::BadgeService;
use crate::domain::progress::ProgressSnapshot;
use crate::domain::progress_service::ProgressService;
use crate::domain::session_service::Session;
use crate::domain::task_service::TaskService;
use crate::domain::user_service::UserService;

#[derive(Debug, Clone, PartialEq)]
pub struct ChildDashboard {
    pub child: User,
    /// Not completed yet
    pub pending_tasks: Vec<Task>,
    /// Completed, validated or not
    pub completed_tasks: Vec<Task>,
    pub progress: ProgressSnapshot,
    pub unlocked_badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParentDashboard {
    pub parent: User,
    pub children: Vec<User>,
    pub selected_child: Option<SelectedChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedChild {
    pub child: User,
    pub awaiting_validation: Vec<Task>,
    pub validated_tasks: Vec<Task>,
    pub open_tasks: Vec<Task>,
    pub progress: ProgressSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    Child(ChildDashboard),
    Parent(ParentDashboard),
}

#[derive(Clone)]
pub struct DashboardService {
    user_service: UserService,
    task_service: TaskService,
    progress_service: ProgressService,
    badge_service: BadgeService,
}

impl DashboardService {
    /// Create a new DashboardService
    pub fn new(
        user_service: UserService,
        task_service: TaskService,
        progress_service: ProgressService,
        badge_service: BadgeService,
    ) -> Self {
        Self {
            user_service,
            task_service,
            progress_service,
            badge_service,
        }
    }

    /// Home screen for whoever is signed in, `None` when nobody is
    pub async fn for_session(&self, session: &Session) -> Option<Dashboard> {
        let user = session.current_user()?.clone();
        Some(self.for_user(user, None).await)
    }

    pub async fn for_user(&self, user: User, selected_child_id: Option<&str>) -> Dashboard {
        match user.role {
            UserRole::Child => Dashboard::Child(self.child_dashboard(user).await),
            UserRole::Parent => Dashboard::Parent(self.parent_dashboard(user, selected_child_id).await),
        }
    }

    pub async fn child_dashboard(&self, child: User) -> ChildDashboard {
        info!("Building dashboard for child: {}", child.id);

        let (completed_tasks, pending_tasks) = self
            .task_service
            .tasks_for_child(&child.id)
            .await
            .into_iter()
            .partition(|task| task.completed);

        let progress = self.progress_service.snapshot_for(&child.id).await;
        let unlocked_badges = self
            .badge_service
            .badge_statuses(&child.id)
            .await
            .into_iter()
            .filter(|status| status.unlocked)
            .map(|status| status.badge)
            .collect();

        ChildDashboard {
            child,
            pending_tasks,
            completed_tasks,
            progress,
            unlocked_badges,
        }
    }

    /// Parent view. An unknown `selected_child_id` falls back to the first child.
    pub async fn parent_dashboard(&self, parent: User, selected_child_id: Option<&str>) -> ParentDashboard {
        info!("Building dashboard for parent: {}", parent.id);

        let children = self.user_service.list_children().await;
        let selected = selected_child_id
            .and_then(|id| children.iter().find(|child| child.id == id))
            .or_else(|| children.first())
            .cloned();

        let selected_child = match selected {
            Some(child) => Some(self.selected_child(child).await),
            None => None,
        };

        ParentDashboard {
            parent,
            children,
            selected_child,
        }
    }

    async fn selected_child(&self, child: User) -> SelectedChild {
        let tasks = self.task_service.tasks_for_child(&child.id).await;

        let mut awaiting_validation = Vec::new();
        let mut validated_tasks = Vec::new();
        let mut open_tasks = Vec::new();
        for task in tasks {
            if task.validated {
                validated_tasks.push(task);
            } else if task.completed {
                awaiting_validation.push(task);
            } else {
                open_tasks.push(task);
            }
        }

        let progress = self.progress_service.snapshot_for(&child.id).await;

        SelectedChild {
            child,
            awaiting_validation,
            validated_tasks,
            open_tasks,
            progress,
        }
    }
}
