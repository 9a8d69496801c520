//! Who is using the device right now.
//!
//! The session is an explicit value owned by the caller. It is loaded once at
//! startup, replaced when someone picks a profile, and cleared on logout. The
//! persisted current-user record only exists so the session survives a restart.

use shared::{User, UserRole};
use tracing::{info, warn};

use crate::storage::StorageService;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.current_user.as_ref().map(|user| user.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

#[derive(Clone)]
pub struct SessionService {
    storage: StorageService,
}

impl SessionService {
    /// Create a new SessionService
    pub fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    /// Restore the session saved by a previous run
    pub async fn load(&self) -> Session {
        let current_user = self.storage.get_current_user().await;
        match &current_user {
            Some(user) => info!("Restored session for {} ({})", user.display_name, user.role),
            None => info!("No saved session"),
        }
        Session { current_user }
    }

    /// Make `user` the session user. Users missing from storage are refused
    /// and the session is left as it was.
    pub async fn select_user(&self, session: &mut Session, user: User) -> bool {
        let is_stored = self.storage.get_users().await.iter().any(|u| u.id == user.id);
        if !is_stored {
            warn!("Refusing to select unknown user: {}", user.id);
            return false;
        }

        info!("Switching session to user: {}", user.id);
        self.storage.set_current_user(Some(&user)).await;
        session.current_user = Some(user);
        true
    }

    pub async fn logout(&self, session: &mut Session) {
        if let Some(user) = session.current_user.take() {
            info!("Logging out user: {}", user.id);
        }
        self.storage.set_current_user(None).await;
    }
}
