//! Fixed key names. They match the layout already present on devices, so they
//! must not change.

pub const CURRENT_USER: &str = "@dinoduty/current_user";
pub const USERS: &str = "@dinoduty/users";
pub const TASKS: &str = "@dinoduty/tasks";
pub const DINO_PROGRESS: &str = "@dinoduty/dino_progress";
pub const BADGES: &str = "@dinoduty/badges";
pub const UNLOCKED_BADGES: &str = "@dinoduty/unlocked_badges";

pub const ALL: [&str; 6] = [
    CURRENT_USER,
    USERS,
    TASKS,
    DINO_PROGRESS,
    BADGES,
    UNLOCKED_BADGES,
];

/// Key holding the unlocked badge ids of one child
pub fn unlocked_badges(child_id: &str) -> String {
    format!("{}_{}", UNLOCKED_BADGES, child_id)
}

pub fn is_unlocked_badges_key(key: &str) -> bool {
    key.strip_prefix(UNLOCKED_BADGES)
        .map(|rest| rest.starts_with('_'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocked_badges_key() {
        assert_eq!(unlocked_badges("user-42"), "@dinoduty/unlocked_badges_user-42");
        assert!(is_unlocked_badges_key("@dinoduty/unlocked_badges_user-42"));
        assert!(!is_unlocked_badges_key(UNLOCKED_BADGES));
        assert!(!is_unlocked_badges_key(TASKS));
    }
}
