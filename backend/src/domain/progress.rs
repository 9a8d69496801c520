//! Progress calculator.
//!
//! Pure functions turning a child's point total into a stage, a level, a
//! percentage within the current stage and the next milestone to aim for.
//!
//! ## Stage table
//!
//! | Stage     | Points    |
//! |-----------|-----------|
//! | egg       | 0 - 20    |
//! | baby      | 21 - 50   |
//! | juvenile  | 51 - 100  |
//! | adult     | 101 - 150 |
//! | legendary | 151 +     |
//!
//! The ranges are contiguous: each stage starts one point after the previous
//! one ends, so every point total maps to exactly one stage.

use serde::{Deserialize, Serialize};
use shared::Stage;

pub const POINTS_PER_LEVEL: u32 = 10;

/// Distance of the synthetic milestone offered once the last stage is reached
pub const LEGENDARY_MILESTONE_STEP: u32 = 50;

/// Display metadata and point range of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    pub stage: Stage,
    pub name: &'static str,
    pub min_points: u32,
    /// Upper bound used for the progress bar. The last stage keeps matching
    /// above it.
    pub max_points: u32,
    pub color: &'static str,
    pub emoji: &'static str,
    /// Label shown when this stage is the next one to reach
    pub milestone_name: &'static str,
}

pub const STAGES: [StageInfo; 5] = [
    StageInfo {
        stage: Stage::Egg,
        name: "Œuf",
        min_points: 0,
        max_points: 20,
        color: "#fef3c7",
        emoji: "🥚",
        milestone_name: "Œuf",
    },
    StageInfo {
        stage: Stage::Baby,
        name: "Bébé",
        min_points: 21,
        max_points: 50,
        color: "#bfdbfe",
        emoji: "🦖",
        milestone_name: "Bébé Dino",
    },
    StageInfo {
        stage: Stage::Juvenile,
        name: "Jeune",
        min_points: 51,
        max_points: 100,
        color: "#fca5a5",
        emoji: "🦕",
        milestone_name: "Jeune Dino",
    },
    StageInfo {
        stage: Stage::Adult,
        name: "Adulte",
        min_points: 101,
        max_points: 150,
        color: "#a78bfa",
        emoji: "🦴",
        milestone_name: "Dino Adulte",
    },
    StageInfo {
        stage: Stage::Legendary,
        name: "Légendaire",
        min_points: 151,
        max_points: 999_999,
        color: "#fbbf24",
        emoji: "👑",
        milestone_name: "Dino Légendaire",
    },
];

const LEGENDARY_MILESTONE_NAME: &str = "Continue comme ça !";

/// Next point threshold worth celebrating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub points: u32,
    pub name: String,
}

/// Everything a progress view needs for one point total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_points: u32,
    pub level: u32,
    pub stage: Stage,
    pub percentage: f64,
    pub next_milestone: Milestone,
}

pub fn stage_info(stage: Stage) -> &'static StageInfo {
    // STAGES is ordered like Stage::ALL
    &STAGES[stage as usize]
}

/// Highest stage whose lower bound has been reached
pub fn stage_for(points: u32) -> Stage {
    STAGES
        .iter()
        .rev()
        .find(|info| points >= info.min_points)
        .map(|info| info.stage)
        .unwrap_or(Stage::Egg)
}

pub fn level_for(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// How far through the current stage `points` is, in `[0, 100]`
pub fn percentage_within_stage(points: u32) -> f64 {
    let info = stage_info(stage_for(points));
    let in_stage = f64::from(points.saturating_sub(info.min_points));
    let range = f64::from(info.max_points - info.min_points);

    (in_stage / range * 100.0).clamp(0.0, 100.0)
}

pub fn next_milestone(points: u32) -> Milestone {
    let stage = stage_for(points);

    match STAGES.get(stage as usize + 1) {
        Some(next) => Milestone {
            points: next.min_points,
            name: next.milestone_name.to_string(),
        },
        None => Milestone {
            points: points.saturating_add(LEGENDARY_MILESTONE_STEP),
            name: LEGENDARY_MILESTONE_NAME.to_string(),
        },
    }
}

pub fn snapshot(points: u32) -> ProgressSnapshot {
    ProgressSnapshot {
        total_points: points,
        level: level_for(points),
        stage: stage_for(points),
        percentage: percentage_within_stage(points),
        next_milestone: next_milestone(points),
    }
}
