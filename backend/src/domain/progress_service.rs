use chrono::Utc;
use shared::{format_timestamp, DinoProgress};
use tracing::{info, warn};

use crate::domain::progress::{self, ProgressSnapshot};
use crate::storage::{ProgressPatch, StorageService};

/// Service owning each child's dino progress record
#[derive(Clone)]
pub struct ProgressService {
    storage: StorageService,
}

impl ProgressService {
    /// Create a new ProgressService
    pub fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    pub async fn find_progress(&self, child_id: &str) -> Option<DinoProgress> {
        self.storage
            .get_dino_progress()
            .await
            .into_iter()
            .find(|p| p.child_id == child_id)
    }

    /// Get the child's progress, creating the starting record if it is missing.
    ///
    /// If storage cannot be written, an unsaved starting record is returned.
    pub async fn get_or_create(&self, child_id: &str) -> DinoProgress {
        if let Some(existing) = self.find_progress(child_id).await {
            return existing;
        }

        info!("Initializing dino progress for child: {}", child_id);
        match self.storage.update_dino_progress(child_id, ProgressPatch::default()).await {
            Some(created) => created,
            None => {
                warn!("Dino progress for child {} could not be saved", child_id);
                DinoProgress::new_for_child(child_id, Utc::now())
            }
        }
    }

    /// Add `points` to the child's total and store the recomputed record
    pub async fn award_points(&self, child_id: &str, points: u32) -> DinoProgress {
        let current = self.find_progress(child_id).await;
        let previous_total = current.as_ref().map(|p| p.total_points).unwrap_or(0);
        let new_total = previous_total.saturating_add(points);

        info!(
            "Awarding {} points to child {}: {} -> {}",
            points, child_id, previous_total, new_total
        );

        match self
            .storage
            .update_dino_progress(child_id, ProgressPatch::total_points(new_total))
            .await
        {
            Some(updated) => {
                if let Some(before) = current {
                    if before.stage != updated.stage {
                        info!("Child {} grew from {} to {}", child_id, before.stage, updated.stage);
                    }
                }
                updated
            }
            None => {
                warn!("Points for child {} could not be saved", child_id);
                let now = Utc::now();
                let mut unsaved = current.unwrap_or_else(|| DinoProgress::new_for_child(child_id, now));
                ProgressPatch::total_points(new_total).apply(&mut unsaved, format_timestamp(now));
                unsaved
            }
        }
    }

    pub async fn snapshot_for(&self, child_id: &str) -> ProgressSnapshot {
        let record = self.get_or_create(child_id).await;
        progress::snapshot(record.total_points)
    }
}
