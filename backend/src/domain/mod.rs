//! # Domain Module
//!
//! Business logic for DinoDuty: who is signed in, which chores exist, how
//! validated chores turn into dino growth and badges.
//!
//! Services are cheap to clone and share one [`StorageService`]. They never
//! touch the key-value store directly.
//!
//! [`StorageService`]: crate::storage::StorageService

pub mod badge_service;
pub mod commands;
pub mod dashboard_service;
pub mod facts;
pub mod ids;
pub mod progress;
pub mod progress_service;
pub mod session_service;
pub mod task_service;
pub mod user_service;

pub use badge_service::{BadgeService, BadgeStatus};
pub use dashboard_service::{ChildDashboard, Dashboard, DashboardService, ParentDashboard, SelectedChild};
pub use progress::{Milestone, ProgressSnapshot, StageInfo};
pub use progress_service::ProgressService;
pub use session_service::{Session, SessionService};
pub use task_service::{TaskError, TaskService};
pub use user_service::{UserError, UserService};
