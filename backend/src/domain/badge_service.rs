//! Badge catalog and per-child unlocks.
//!
//! A badge is earned once the child's point total reaches `points_required`
//! and their number of validated tasks reaches `tasks_required`. Unlocks are
//! never revoked.

use serde::{Deserialize, Serialize};
use shared::Badge;
use tracing::info;

use crate::storage::StorageService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStatus {
    pub badge: Badge,
    pub unlocked: bool,
}

#[derive(Clone)]
pub struct BadgeService {
    storage: StorageService,
}

impl BadgeService {
    /// Create a new BadgeService
    pub fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    pub async fn catalog(&self) -> Vec<Badge> {
        self.storage.get_badges().await
    }

    pub async fn unlocked_badge_ids(&self, child_id: &str) -> Vec<String> {
        self.storage.get_unlocked_badges(child_id).await
    }

    /// Every catalog badge with whether the child already has it
    pub async fn badge_statuses(&self, child_id: &str) -> Vec<BadgeStatus> {
        let unlocked = self.unlocked_badge_ids(child_id).await;

        self.catalog()
            .await
            .into_iter()
            .map(|badge| {
                let unlocked = unlocked.contains(&badge.id);
                BadgeStatus { badge, unlocked }
            })
            .collect()
    }

    pub fn is_earned(badge: &Badge, total_points: u32, validated_tasks: u32) -> bool {
        total_points >= badge.points_required && validated_tasks >= badge.tasks_required
    }

    /// Unlock every badge the child now qualifies for.
    ///
    /// Returns only the badges unlocked by this call.
    pub async fn evaluate(&self, child_id: &str, total_points: u32, validated_tasks: u32) -> Vec<Badge> {
        let mut newly_unlocked = Vec::new();

        for badge in self.catalog().await {
            if !Self::is_earned(&badge, total_points, validated_tasks) {
                continue;
            }
            if self.storage.unlock_badge(child_id, &badge.id).await {
                info!("Child {} unlocked badge {} ({})", child_id, badge.id, badge.name);
                newly_unlocked.push(badge);
            }
        }

        newly_unlocked
    }
}
