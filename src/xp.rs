use serde::{Deserialize, Serialize};

use crate::constants::MAX_LEVEL;

/// Five-tier rank ladder, derived purely from level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Novice,
    Apprentice,
    Scholar,
    Expert,
    Master,
}

/// Progress toward the daily XP goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoalProgress {
    pub percentage: u32,
    pub remaining: u32,
    pub completed: bool,
}

/// `floor(sqrt(xp / 100)) + 1`, capped at [`MAX_LEVEL`].
pub fn calculate_level(xp: u64) -> u32 {
    let level = (xp as f64 / 100.0).sqrt().floor() as u32 + 1;
    level.min(MAX_LEVEL)
}

/// Cumulative XP required to reach `level`. Inverse of [`calculate_level`].
pub fn xp_for_level(level: u32) -> u64 {
    let base = u64::from(level.saturating_sub(1));
    base * base * 100
}

/// Rank thresholds at levels 1 / 10 / 20 / 30 / 40.
pub fn calculate_rank(level: u32) -> Rank {
    match level {
        0..=9 => Rank::Novice,
        10..=19 => Rank::Apprentice,
        20..=29 => Rank::Scholar,
        30..=39 => Rank::Expert,
        _ => Rank::Master,
    }
}

/// Percentage is capped at 100 so overshooting the goal still reads "done".
pub fn daily_goal_progress(daily_xp: u32, goal: u32) -> DailyGoalProgress {
    if goal == 0 {
        return DailyGoalProgress {
            percentage: 100,
            remaining: 0,
            completed: true,
        };
    }
    DailyGoalProgress {
        percentage: (u64::from(daily_xp) * 100 / u64::from(goal)).min(100) as u32,
        remaining: goal.saturating_sub(daily_xp),
        completed: daily_xp >= goal,
    }
}
