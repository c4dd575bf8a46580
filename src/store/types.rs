use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAILY_XP_GOAL, DEFAULT_EASINESS, MIN_COMFORT_LEVEL};
use crate::xp::Rank;

/// One vocabulary card with its SM-2 scheduling state and accuracy counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: String,
    pub front: String,
    pub back: String,
    pub phonetic: Option<String>,
    pub category: String,
    pub example: Option<String>,
    pub easiness: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
    pub times_correct: u32,
    pub times_incorrect: u32,
    pub mastered: bool,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub added_at: DateTime<Utc>,
}

impl VocabularyItem {
    /// New item starts at the SM-2 defaults and is due immediately.
    pub fn new(id: String, front: String, back: String, category: String, today: NaiveDate) -> Self {
        Self {
            id,
            front,
            back,
            phonetic: None,
            category,
            example: None,
            easiness: DEFAULT_EASINESS,
            interval_days: 0,
            repetitions: 0,
            next_review_date: today,
            times_correct: 0,
            times_incorrect: 0,
            mastered: false,
            last_reviewed_at: None,
            added_at: Utc::now(),
        }
    }

    /// Merge recency: last review wins, an untouched item falls back to its
    /// creation time.
    pub fn activity_timestamp(&self) -> DateTime<Utc> {
        self.last_reviewed_at.unwrap_or(self.added_at)
    }
}

/// 用户对单条短语的练习进度，短语内容本身由静态内容包提供
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseProgress {
    pub phrase_id: String,
    pub practiced_count: u32,
    pub last_practiced: Option<DateTime<Utc>>,
    pub comfort_level: u8,
    pub is_learned: bool,
}

impl PhraseProgress {
    pub fn new(phrase_id: String) -> Self {
        Self {
            phrase_id,
            practiced_count: 0,
            last_practiced: None,
            comfort_level: MIN_COMFORT_LEVEL,
            is_learned: false,
        }
    }
}

/// Aggregate profile: XP/level, streak state and lifetime counters. One
/// record per user; `updated_at` drives the sync merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_xp: u64,
    pub current_level: u32,
    pub current_rank: Rank,
    pub daily_xp: u32,
    pub daily_xp_goal: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_freeze_available: bool,
    pub last_practice_date: Option<NaiveDate>,
    pub words_learned: u32,
    pub phrases_practiced: u32,
    pub practice_sessions: u32,
    pub time_spent_minutes: u32,
    pub updated_at: DateTime<Utc>,
}

impl Default for ProfileStats {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
            current_rank: Rank::Novice,
            daily_xp: 0,
            daily_xp_goal: DEFAULT_DAILY_XP_GOAL,
            current_streak: 0,
            longest_streak: 0,
            streak_freeze_available: false,
            last_practice_date: None,
            words_learned: 0,
            phrases_practiced: 0,
            practice_sessions: 0,
            time_spent_minutes: 0,
            updated_at: Utc::now(),
        }
    }
}

/// What a locked achievement is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementKind {
    WordsLearned,
    PhrasesPracticed,
    Streak,
    TotalXp,
    PracticeSessions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub kind: AchievementKind,
    pub threshold: u64,
    pub xp_reward: u32,
    pub unlocked: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Streak achievements key off the longest streak so losing the streak
    /// later does not re-lock anything.
    pub fn requirement_met(&self, stats: &ProfileStats) -> bool {
        let value = match self.kind {
            AchievementKind::WordsLearned => u64::from(stats.words_learned),
            AchievementKind::PhrasesPracticed => u64::from(stats.phrases_practiced),
            AchievementKind::Streak => u64::from(stats.longest_streak),
            AchievementKind::TotalXp => stats.total_xp,
            AchievementKind::PracticeSessions => u64::from(stats.practice_sessions),
        };
        value >= self.threshold
    }
}

/// Per-calendar-day activity counters; reset on local-day rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub xp_earned: u32,
    pub words_reviewed: u32,
    pub phrases_practiced: u32,
}

impl DailyProgress {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            xp_earned: 0,
            words_reviewed: 0,
            phrases_practiced: 0,
        }
    }
}

/// Level transition reported by [`add_xp`](crate::store::ProgressStore::add_xp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUp {
    pub did_level_up: bool,
    pub old_level: u32,
    pub new_level: u32,
    pub old_rank: Rank,
    pub new_rank: Rank,
}

/// User-authored item before validation assigns it an id and defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVocabularyItem {
    pub front: String,
    pub back: String,
    pub phonetic: Option<String>,
    pub category: String,
    pub example: Option<String>,
}

/// Entry in the bundled starter catalog; ids are stable across releases.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub front: String,
    pub back: String,
    pub phonetic: Option<String>,
    pub category: String,
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_due_immediately() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let item = VocabularyItem::new("w1".into(), "a".into(), "b".into(), "c".into(), today);
        assert_eq!(item.next_review_date, today);
        assert_eq!(item.easiness, DEFAULT_EASINESS);
        assert_eq!(item.activity_timestamp(), item.added_at);
    }

    #[test]
    fn serde_uses_camel_case() {
        let profile = ProfileStats::default();
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("totalXp").is_some());
        assert!(json.get("dailyXpGoal").is_some());
        assert!(json.get("total_xp").is_none());
    }

    #[test]
    fn streak_requirement_uses_longest() {
        let achievement = Achievement {
            id: "week-streak".into(),
            title: "One Week Streak".into(),
            kind: AchievementKind::Streak,
            threshold: 7,
            xp_reward: 30,
            unlocked: false,
            earned_at: None,
        };
        let stats = ProfileStats {
            current_streak: 1,
            longest_streak: 8,
            ..Default::default()
        };
        assert!(achievement.requirement_met(&stats));
    }
}
