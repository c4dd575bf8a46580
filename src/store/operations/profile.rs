use chrono::{NaiveDate, Utc};

use crate::constants::DAILY_XP_GOALS;
use crate::store::types::{DailyProgress, LevelUp};
use crate::store::ProgressStore;
use crate::streak::{self, StreakUpdate};
use crate::xp::{self, DailyGoalProgress};

impl ProgressStore {
    /// Grant XP and recompute the derived level/rank. Returns whether a level
    /// boundary was crossed so the UI can celebrate.
    pub fn add_xp(&mut self, amount: u32) -> LevelUp {
        let old_level = self.profile.current_level;
        let old_rank = self.profile.current_rank;

        self.profile.total_xp += u64::from(amount);
        self.profile.daily_xp += amount;
        self.daily.xp_earned += amount;
        self.profile.current_level = xp::calculate_level(self.profile.total_xp);
        self.profile.current_rank = xp::calculate_rank(self.profile.current_level);
        self.profile.updated_at = Utc::now();

        self.persist_profile();
        self.persist_daily();
        self.mark_dirty();

        let new_level = self.profile.current_level;
        if new_level > old_level {
            tracing::info!(old_level, new_level, "Level up");
        }

        LevelUp {
            did_level_up: new_level > old_level,
            old_level,
            new_level,
            old_rank,
            new_rank: self.profile.current_rank,
        }
    }

    /// Record today's practice for the streak. A second call on the same day
    /// is a no-op. Milestone bonus XP is applied through [`Self::add_xp`];
    /// a freeze is awarded on every 7th consecutive day.
    pub fn update_practice_streak(&mut self, today: NaiveDate) -> StreakUpdate {
        self.roll_daily_if_needed(today);

        let update = streak::update_streak(
            self.profile.current_streak,
            self.profile.last_practice_date,
            self.profile.streak_freeze_available,
            today,
        );

        if !update.streak_increased && !update.streak_lost {
            return update;
        }

        self.profile.current_streak = update.new_streak;
        self.profile.longest_streak = self.profile.longest_streak.max(update.new_streak);
        if update.freeze_used {
            self.profile.streak_freeze_available = false;
        }
        if update.streak_increased && streak::freeze_earned(update.new_streak) {
            self.profile.streak_freeze_available = true;
        }
        self.profile.last_practice_date = Some(today);
        self.profile.updated_at = Utc::now();

        self.persist_profile();
        self.mark_dirty();

        if update.bonus_xp > 0 {
            tracing::info!(
                milestone = ?update.milestone_reached,
                bonus_xp = update.bonus_xp,
                "Streak milestone reached"
            );
            self.add_xp(update.bonus_xp);
        }

        update
    }

    /// Practice-session counters (sessions + minutes).
    pub fn record_session(&mut self, minutes: u32) {
        self.profile.practice_sessions += 1;
        self.profile.time_spent_minutes += minutes;
        self.profile.updated_at = Utc::now();
        self.persist_profile();
        self.mark_dirty();
    }

    /// Goal must come from the fixed goal set; anything else is ignored.
    pub fn set_daily_xp_goal(&mut self, goal: u32) -> bool {
        if !DAILY_XP_GOALS.contains(&goal) {
            tracing::warn!(goal, "Rejected daily XP goal outside the allowed set");
            return false;
        }
        self.profile.daily_xp_goal = goal;
        self.profile.updated_at = Utc::now();
        self.persist_profile();
        self.mark_dirty();
        true
    }

    pub fn daily_goal_progress(&self) -> DailyGoalProgress {
        xp::daily_goal_progress(self.profile.daily_xp, self.profile.daily_xp_goal)
    }

    /// Local-day rollover: zero the daily XP and counters. Cumulative totals
    /// and the streak are untouched.
    pub fn reset_daily_progress(&mut self, today: NaiveDate) {
        self.daily = DailyProgress::for_date(today);
        self.profile.daily_xp = 0;
        self.profile.updated_at = Utc::now();
        self.persist_profile();
        self.persist_daily();
        self.mark_dirty();
    }

    /// 跨天后的第一次写操作自动滚动每日记录
    pub(crate) fn roll_daily_if_needed(&mut self, today: NaiveDate) {
        if self.daily.date < today {
            self.reset_daily_progress(today);
        }
    }
}
