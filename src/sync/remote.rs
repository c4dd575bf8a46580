use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::types::{DailyProgress, PhraseProgress, ProfileStats, VocabularyItem};
use crate::xp::Rank;

/// Errors from the remote collaborator. Expected conditions; the sync layer
/// retries and surfaces status, it never panics on these.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote request timed out")]
    Timeout,
    #[error("remote network error: {0}")]
    Network(String),
    #[error("remote api error: status={status}, message={message}")]
    Api { status: u16, message: String },
    #[error("remote payload decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RemoteError::Timeout
        } else if error.is_decode() {
            RemoteError::Decode(error.to_string())
        } else {
            RemoteError::Network(error.to_string())
        }
    }
}

/// `profiles` table row: mirrors [`ProfileStats`] plus identity and display
/// name. Remote tables use snake_case columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub user_id: String,
    pub display_name: Option<String>,
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

impl ProfileRow {
    pub fn from_stats(user_id: &str, display_name: Option<String>, stats: &ProfileStats) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name,
            total_xp: stats.total_xp,
            current_level: stats.current_level,
            current_rank: stats.current_rank,
            daily_xp: stats.daily_xp,
            daily_xp_goal: stats.daily_xp_goal,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            streak_freeze_available: stats.streak_freeze_available,
            last_practice_date: stats.last_practice_date,
            words_learned: stats.words_learned,
            phrases_practiced: stats.phrases_practiced,
            practice_sessions: stats.practice_sessions,
            time_spent_minutes: stats.time_spent_minutes,
            updated_at: stats.updated_at,
        }
    }

    pub fn into_stats(self) -> ProfileStats {
        ProfileStats {
            total_xp: self.total_xp,
            current_level: self.current_level,
            current_rank: self.current_rank,
            daily_xp: self.daily_xp,
            daily_xp_goal: self.daily_xp_goal,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            streak_freeze_available: self.streak_freeze_available,
            last_practice_date: self.last_practice_date,
            words_learned: self.words_learned,
            phrases_practiced: self.phrases_practiced,
            practice_sessions: self.practice_sessions,
            time_spent_minutes: self.time_spent_minutes,
            updated_at: self.updated_at,
        }
    }
}

/// `vocabulary` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRow {
    pub user_id: String,
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

impl VocabularyRow {
    pub fn from_item(user_id: &str, item: &VocabularyItem) -> Self {
        Self {
            user_id: user_id.to_string(),
            id: item.id.clone(),
            front: item.front.clone(),
            back: item.back.clone(),
            phonetic: item.phonetic.clone(),
            category: item.category.clone(),
            example: item.example.clone(),
            easiness: item.easiness,
            interval_days: item.interval_days,
            repetitions: item.repetitions,
            next_review_date: item.next_review_date,
            times_correct: item.times_correct,
            times_incorrect: item.times_incorrect,
            mastered: item.mastered,
            last_reviewed_at: item.last_reviewed_at,
            added_at: item.added_at,
        }
    }

    pub fn into_item(self) -> VocabularyItem {
        VocabularyItem {
            id: self.id,
            front: self.front,
            back: self.back,
            phonetic: self.phonetic,
            category: self.category,
            example: self.example,
            easiness: self.easiness,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
            next_review_date: self.next_review_date,
            times_correct: self.times_correct,
            times_incorrect: self.times_incorrect,
            mastered: self.mastered,
            last_reviewed_at: self.last_reviewed_at,
            added_at: self.added_at,
        }
    }
}

/// `user_phrase_progress` table row, keyed by (user, phrase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseProgressRow {
    pub user_id: String,
    pub phrase_id: String,
    pub practiced_count: u32,
    pub last_practiced: Option<DateTime<Utc>>,
    pub comfort_level: u8,
    pub is_learned: bool,
}

impl PhraseProgressRow {
    pub fn from_progress(user_id: &str, progress: &PhraseProgress) -> Self {
        Self {
            user_id: user_id.to_string(),
            phrase_id: progress.phrase_id.clone(),
            practiced_count: progress.practiced_count,
            last_practiced: progress.last_practiced,
            comfort_level: progress.comfort_level,
            is_learned: progress.is_learned,
        }
    }

    pub fn into_progress(self) -> PhraseProgress {
        PhraseProgress {
            phrase_id: self.phrase_id,
            practiced_count: self.practiced_count,
            last_practiced: self.last_practiced,
            comfort_level: self.comfort_level,
            is_learned: self.is_learned,
        }
    }
}

/// `daily_progress` table row, keyed by (user, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgressRow {
    pub user_id: String,
    pub date: NaiveDate,
    pub xp_earned: u32,
    pub words_reviewed: u32,
    pub phrases_practiced: u32,
}

impl DailyProgressRow {
    pub fn from_daily(user_id: &str, daily: &DailyProgress) -> Self {
        Self {
            user_id: user_id.to_string(),
            date: daily.date,
            xp_earned: daily.xp_earned,
            words_reviewed: daily.words_reviewed,
            phrases_practiced: daily.phrases_practiced,
        }
    }

    pub fn into_daily(self) -> DailyProgress {
        DailyProgress {
            date: self.date,
            xp_earned: self.xp_earned,
            words_reviewed: self.words_reviewed,
            phrases_practiced: self.phrases_practiced,
        }
    }
}

/// The remote collaborator as the core consumes it: upsert-by-key and
/// select-by-identity over the logical tables. Realtime change feeds are not
/// part of the seam; the coordinator's interval pass covers freshness.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn upsert_profile(&self, row: &ProfileRow) -> Result<(), RemoteError>;
    async fn upsert_vocabulary(&self, rows: &[VocabularyRow]) -> Result<(), RemoteError>;
    async fn upsert_phrase_progress(&self, rows: &[PhraseProgressRow]) -> Result<(), RemoteError>;
    async fn upsert_daily_progress(&self, row: &DailyProgressRow) -> Result<(), RemoteError>;

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRow>, RemoteError>;
    async fn fetch_vocabulary(&self, user_id: &str) -> Result<Vec<VocabularyRow>, RemoteError>;
    async fn fetch_phrase_progress(
        &self,
        user_id: &str,
    ) -> Result<Vec<PhraseProgressRow>, RemoteError>;
    async fn fetch_daily_progress(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyProgressRow>, RemoteError>;
}
