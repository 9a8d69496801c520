use anyhow::Result;
use shared::{timestamp_now, User, UserRole};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::commands::user::CreateUserCommand;
use crate::domain::ids::unique_id;
use crate::domain::progress_service::ProgressService;
use crate::domain::session_service::{Session, SessionService};
use crate::storage::{StorageService, UserPatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Display name cannot be empty")]
    EmptyDisplayName,
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Parent not found: {0}")]
    UnknownParent(String),
    #[error("Only children can be linked to a parent")]
    NotAChild,
    #[error("User {0} could not be saved")]
    NotSaved(String),
}

/// Service for onboarding and managing the people using the device
#[derive(Clone)]
pub struct UserService {
    storage: StorageService,
    session_service: SessionService,
    progress_service: ProgressService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(
        storage: StorageService,
        session_service: SessionService,
        progress_service: ProgressService,
    ) -> Self {
        Self {
            storage,
            session_service,
            progress_service,
        }
    }

    /// Onboard a new user and make them the session user.
    ///
    /// Children also get their starting dino progress.
    pub async fn create_user(&self, session: &mut Session, command: CreateUserCommand) -> Result<User> {
        info!("Creating user: name={}, role={}", command.display_name, command.role);

        let display_name = Self::validate_display_name(&command.display_name)?;

        if let Some(parent_id) = &command.parent_id {
            if command.role != UserRole::Child {
                return Err(UserError::NotAChild.into());
            }
            self.require_parent(parent_id).await?;
        }

        let users = self.storage.get_users().await;
        let user = User {
            id: unique_id(User::generate_id, |id| users.iter().any(|u| u.id == id)),
            display_name,
            role: command.role,
            parent_id: command.parent_id,
            created_at: timestamp_now(),
        };

        if !self.storage.add_user(&user).await {
            warn!("User {} was not saved", user.id);
            return Err(UserError::NotSaved(user.id).into());
        }
        self.session_service.select_user(session, user.clone()).await;

        if user.is_child() {
            self.progress_service.get_or_create(&user.id).await;
        }

        info!("Created {} {} with ID: {}", user.role, user.display_name, user.id);
        Ok(user)
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.storage.get_users().await
    }

    pub async fn list_children(&self) -> Vec<User> {
        self.list_users()
            .await
            .into_iter()
            .filter(|user| user.is_child())
            .collect()
    }

    pub async fn get_user(&self, user_id: &str) -> Option<User> {
        self.list_users().await.into_iter().find(|user| user.id == user_id)
    }

    /// Switch the session to an existing user
    pub async fn sign_in(&self, session: &mut Session, user_id: &str) -> Result<User> {
        info!("Signing in user: {}", user_id);

        let user = self
            .get_user(user_id)
            .await
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;
        if !self.session_service.select_user(session, user.clone()).await {
            return Err(UserError::NotFound(user_id.to_string()).into());
        }
        Ok(user)
    }

    pub async fn rename_user(&self, user_id: &str, display_name: &str) -> Result<User> {
        info!("Renaming user: {}", user_id);

        let display_name = Self::validate_display_name(display_name)?;
        let mut user = self
            .get_user(user_id)
            .await
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        let patch = UserPatch {
            display_name: Some(display_name),
            ..UserPatch::default()
        };
        if !self.storage.update_user(user_id, patch.clone()).await {
            warn!("Rename of user {} was not saved", user_id);
            return Err(UserError::NotSaved(user_id.to_string()).into());
        }
        patch.apply(&mut user);

        Ok(user)
    }

    pub async fn link_child_to_parent(&self, child_id: &str, parent_id: &str) -> Result<User> {
        info!("Linking child {} to parent {}", child_id, parent_id);

        let mut child = self
            .get_user(child_id)
            .await
            .ok_or_else(|| UserError::NotFound(child_id.to_string()))?;
        if !child.is_child() {
            return Err(UserError::NotAChild.into());
        }
        self.require_parent(parent_id).await?;

        let patch = UserPatch {
            parent_id: Some(Some(parent_id.to_string())),
            ..UserPatch::default()
        };
        if !self.storage.update_user(child_id, patch.clone()).await {
            warn!("Parent link for child {} was not saved", child_id);
            return Err(UserError::NotSaved(child_id.to_string()).into());
        }
        patch.apply(&mut child);

        Ok(child)
    }

    async fn require_parent(&self, parent_id: &str) -> Result<(), UserError> {
        match self.get_user(parent_id).await {
            Some(user) if user.is_parent() => Ok(()),
            _ => Err(UserError::UnknownParent(parent_id.to_string())),
        }
    }

    fn validate_display_name(display_name: &str) -> Result<String, UserError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyDisplayName);
        }
        Ok(trimmed.to_string())
    }
}
