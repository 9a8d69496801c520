use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a person using the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Parent,
    Child,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserRole::Parent => write!(f, "parent"),
            UserRole::Child => write!(f, "child"),
        }
    }
}

/// User ID in format: "user-<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    /// Fixed at creation, never changes afterwards
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl User {
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("user-{}", epoch_millis)
    }

    pub fn is_child(&self) -> bool {
        self.role == UserRole::Child
    }

    pub fn is_parent(&self) -> bool {
        self.role == UserRole::Parent
    }
}

/// How often a chore is expected to be done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFrequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

/// A chore assigned by a parent to one child.
///
/// Lifecycle: created -> completed (child) -> validated (parent), with a
/// one-step rollback from completed back to open when a parent rejects it.
/// A task is never validated without also being completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub points: u32,
    pub frequency: TaskFrequency,
    pub child_id: String,
    pub completed: bool,
    pub validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<String>,
    pub created_at: String,
}

impl Task {
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("task-{}", epoch_millis)
    }

    /// Completed by the child and waiting for a parent decision
    pub fn is_pending_validation(&self) -> bool {
        self.completed && !self.validated
    }
}

/// Growth phase of a child's dinosaur, ordered from first to last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Egg,
    Baby,
    Juvenile,
    Adult,
    Legendary,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Egg,
        Stage::Baby,
        Stage::Juvenile,
        Stage::Adult,
        Stage::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Egg => "egg",
            Stage::Baby => "baby",
            Stage::Juvenile => "juvenile",
            Stage::Adult => "adult",
            Stage::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-child growth record. `level` and `stage` are derived from
/// `total_points` and are always written together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DinoProgress {
    pub id: String,
    pub child_id: String,
    pub total_points: u32,
    pub level: u32,
    pub stage: Stage,
    pub last_updated: String,
}

impl DinoProgress {
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("progress-{}", epoch_millis)
    }

    /// Fresh record for a child that has not earned anything yet
    pub fn new_for_child(child_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(now.timestamp_millis() as u64),
            child_id: child_id.to_string(),
            total_points: 0,
            level: 1,
            stage: Stage::Egg,
            last_updated: format_timestamp(now),
        }
    }
}

/// Achievement from the static catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points_required: u32,
    pub tasks_required: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DinoFact {
    pub id: String,
    pub fact: String,
    pub category: String,
}

/// Render a timestamp the way every persisted record stores it:
/// RFC 3339, millisecond precision, `Z` suffix.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}
