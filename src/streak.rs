use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{STREAK_FREEZE_EVERY, STREAK_MILESTONES, STREAK_MILESTONE_BONUS_XP};

/// Outcome of a single streak transition. Purely descriptive: the caller is
/// responsible for clearing the freeze when `freeze_used` and for persisting
/// the new streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    pub new_streak: u32,
    pub streak_increased: bool,
    pub streak_lost: bool,
    pub freeze_used: bool,
    pub milestone_reached: Option<u32>,
    pub bonus_xp: u32,
}

impl StreakUpdate {
    fn unchanged(streak: u32) -> Self {
        Self {
            new_streak: streak,
            streak_increased: false,
            streak_lost: false,
            freeze_used: false,
            milestone_reached: None,
            bonus_xp: 0,
        }
    }

    fn increased(new_streak: u32, freeze_used: bool) -> Self {
        let (milestone_reached, bonus_xp) = milestone_bonus(new_streak);
        Self {
            new_streak,
            streak_increased: true,
            streak_lost: false,
            freeze_used,
            milestone_reached,
            bonus_xp,
        }
    }
}

/// Streak transition for a practice event happening on `today`.
///
/// 按本地日历的天数差驱动状态机，而不是毫秒差：
/// 无记录 → 1 天；同日 → 不变；隔 1 天 → +1；隔 2 天且有冻结 → +1 并消耗冻结；
/// 其余情况 → 回落到 1。
pub fn update_streak(
    current_streak: u32,
    last_practice_date: Option<NaiveDate>,
    freeze_available: bool,
    today: NaiveDate,
) -> StreakUpdate {
    let Some(last) = last_practice_date else {
        return StreakUpdate::increased(1, false);
    };

    let elapsed = (today - last).num_days();
    match elapsed {
        i64::MIN..=0 => StreakUpdate::unchanged(current_streak),
        1 => StreakUpdate::increased(current_streak + 1, false),
        2 if freeze_available => StreakUpdate::increased(current_streak + 1, true),
        _ => StreakUpdate {
            new_streak: 1,
            streak_increased: false,
            streak_lost: true,
            freeze_used: false,
            milestone_reached: None,
            bonus_xp: 0,
        },
    }
}

/// Whether reaching `new_streak` earns a streak freeze (every 7th day).
pub fn freeze_earned(new_streak: u32) -> bool {
    new_streak > 0 && new_streak % STREAK_FREEZE_EVERY == 0
}

fn milestone_bonus(streak: u32) -> (Option<u32>, u32) {
    match STREAK_MILESTONES.iter().position(|&m| m == streak) {
        Some(idx) => (Some(streak), STREAK_MILESTONE_BONUS_XP[idx]),
        None => (None, 0),
    }
}
