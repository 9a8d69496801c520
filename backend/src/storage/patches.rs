//! Partial updates for stored records.
//!
//! A `None` field leaves the stored value untouched. Optional record fields use
//! `Option<Option<_>>` so a patch can either set them or clear them.

use shared::{DinoProgress, Task, TaskFrequency, User};

use crate::domain::progress::{level_for, stage_for};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub parent_id: Option<Option<String>>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(display_name) = self.display_name {
            user.display_name = display_name;
        }
        if let Some(parent_id) = self.parent_id {
            user.parent_id = parent_id;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub points: Option<u32>,
    pub frequency: Option<TaskFrequency>,
    pub completed: Option<bool>,
    pub validated: Option<bool>,
    pub completed_at: Option<Option<String>>,
    pub validated_at: Option<Option<String>>,
}

impl TaskPatch {
    /// Child reports the task as done
    pub fn mark_completed(at: String) -> Self {
        Self {
            completed: Some(true),
            completed_at: Some(Some(at)),
            ..Self::default()
        }
    }

    /// Parent accepts the completion
    pub fn mark_validated(at: String) -> Self {
        Self {
            validated: Some(true),
            validated_at: Some(Some(at)),
            ..Self::default()
        }
    }

    /// Parent sends the task back to the child
    pub fn reopen() -> Self {
        Self {
            completed: Some(false),
            completed_at: Some(None),
            ..Self::default()
        }
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(points) = self.points {
            task.points = points;
        }
        if let Some(frequency) = self.frequency {
            task.frequency = frequency;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(validated) = self.validated {
            task.validated = validated;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(validated_at) = self.validated_at {
            task.validated_at = validated_at;
        }
    }
}

/// Only the point total can be patched; level and stage follow from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressPatch {
    pub total_points: Option<u32>,
}

impl ProgressPatch {
    pub fn total_points(points: u32) -> Self {
        Self {
            total_points: Some(points),
        }
    }

    /// Merge into `progress`, recompute the derived fields and stamp the time
    pub fn apply(self, progress: &mut DinoProgress, now: String) {
        if let Some(total_points) = self.total_points {
            progress.total_points = total_points;
        }
        progress.level = level_for(progress.total_points);
        progress.stage = stage_for(progress.total_points);
        progress.last_updated = now;
    }
}
