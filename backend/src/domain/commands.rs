//! Domain-level command and result types.
//! Services take these as input and hand them back as output; nothing here is
//! persisted.

pub mod user {
    use shared::UserRole;

    /// Input for onboarding a new person on the device.
    #[derive(Debug, Clone)]
    pub struct CreateUserCommand {
        pub display_name: String,
        pub role: UserRole,
        /// Only meaningful for children
        pub parent_id: Option<String>,
    }
}

pub mod task {
    use shared::{Badge, DinoProgress, Task, TaskFrequency};

    /// Input for creating a chore.
    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub child_id: String,
        pub title: String,
        pub description: Option<String>,
        /// Defaults to 5 when absent
        pub points: Option<u32>,
        /// Defaults to daily when absent
        pub frequency: Option<TaskFrequency>,
    }

    /// Result of a child marking a task as done.
    #[derive(Debug, Clone)]
    pub struct TaskCompletionResult {
        pub task: Task,
        pub fact: &'static str,
    }

    /// Result of a parent accepting a completed task.
    #[derive(Debug, Clone)]
    pub struct TaskValidationResult {
        pub task: Task,
        pub progress: DinoProgress,
        pub newly_unlocked_badges: Vec<Badge>,
    }
}
