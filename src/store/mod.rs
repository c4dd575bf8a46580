pub mod operations;
pub mod snapshot;
pub mod types;

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::rewards::RewardTable;
use self::snapshot::Snapshot;
use self::types::{Achievement, DailyProgress, PhraseProgress, ProfileStats, VocabularyItem};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(&'static str),
}

/// Everything the sync layer needs for one push, cloned out of the store so
/// the read lock can be released before any network call.
#[derive(Debug, Clone)]
pub struct StatePayload {
    pub profile: ProfileStats,
    pub vocabulary: Vec<VocabularyItem>,
    pub phrases: Vec<PhraseProgress>,
    pub daily: DailyProgress,
}

/// Remote state handed to [`ProgressStore::merge_remote`] after a pull.
#[derive(Debug, Clone, Default)]
pub struct RemoteState {
    pub profile: Option<ProfileStats>,
    pub vocabulary: Vec<VocabularyItem>,
    pub phrases: Vec<PhraseProgress>,
    pub daily: Option<DailyProgress>,
}

/// In-memory authoritative progress state with write-through persistence to
/// a sled-backed local snapshot.
///
/// Single-writer: the embedding layer owns it behind an `Arc<RwLock<..>>` and
/// all mutations are synchronous. The sync coordinator only reads cloned
/// payloads and writes back through [`merge_remote`](Self::merge_remote).
#[derive(Debug)]
pub struct ProgressStore {
    vocabulary: HashMap<String, VocabularyItem>,
    phrases: HashMap<String, PhraseProgress>,
    profile: ProfileStats,
    achievements: HashMap<String, Achievement>,
    daily: DailyProgress,
    rewards: RewardTable,
    snapshot: Snapshot,
    dirty_tx: Option<mpsc::UnboundedSender<()>>,
}

/// 本地日历的“今天”，调度与打卡都以它为准
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl ProgressStore {
    /// Open the snapshot at `path` and load all state. A corrupted snapshot
    /// surfaces as an error; callers are expected to fall back to a fresh
    /// store (e.g. by wiping the directory) rather than crash.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let snapshot = Snapshot::open(path)?;

        let vocabulary = snapshot
            .load_vocabulary()?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        let phrases = snapshot
            .load_phrases()?
            .into_iter()
            .map(|progress| (progress.phrase_id.clone(), progress))
            .collect();
        let profile = snapshot.load_profile()?.unwrap_or_default();

        let mut achievements: HashMap<String, Achievement> = snapshot
            .load_achievements()?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();
        // 补齐目录里新增的成就，已解锁状态不受影响
        for entry in operations::achievements::default_catalog() {
            achievements.entry(entry.id.clone()).or_insert(entry);
        }

        let daily = snapshot
            .load_daily()?
            .unwrap_or_else(|| DailyProgress::for_date(local_today()));

        Ok(Self {
            vocabulary,
            phrases,
            profile,
            achievements,
            daily,
            rewards: RewardTable::default(),
            snapshot,
            dirty_tx: None,
        })
    }

    /// Wire the dirty-notification channel consumed by the sync coordinator.
    pub fn set_dirty_notifier(&mut self, tx: mpsc::UnboundedSender<()>) {
        self.dirty_tx = Some(tx);
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn profile(&self) -> &ProfileStats {
        &self.profile
    }

    pub fn daily(&self) -> &DailyProgress {
        &self.daily
    }

    pub fn item(&self, id: &str) -> Option<&VocabularyItem> {
        self.vocabulary.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.vocabulary.values()
    }

    pub fn phrase(&self, id: &str) -> Option<&PhraseProgress> {
        self.phrases.get(id)
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.get(id)
    }

    pub fn achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values()
    }

    /// Cloned outgoing state for a push cycle.
    pub fn state_payload(&self) -> StatePayload {
        StatePayload {
            profile: self.profile.clone(),
            vocabulary: self.vocabulary.values().cloned().collect(),
            phrases: self.phrases.values().cloned().collect(),
            daily: self.daily.clone(),
        }
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.snapshot.flush()
    }

    pub(crate) fn mark_dirty(&self) {
        if let Some(tx) = &self.dirty_tx {
            // 接收端关闭说明协调器已停机，丢弃即可
            let _ = tx.send(());
        }
    }

    // -- write-through helpers; persistence failure is logged, never rolls
    //    back the in-memory mutation (local-first) --

    pub(crate) fn persist_item(&self, item: &VocabularyItem) {
        if let Err(e) = self.snapshot.save_vocabulary_item(item) {
            tracing::error!(error = %e, id = %item.id, "Failed to persist vocabulary item");
        }
    }

    pub(crate) fn persist_item_removal(&self, id: &str) {
        if let Err(e) = self.snapshot.remove_vocabulary_item(id) {
            tracing::error!(error = %e, id, "Failed to remove vocabulary item from snapshot");
        }
    }

    pub(crate) fn persist_phrase(&self, progress: &PhraseProgress) {
        if let Err(e) = self.snapshot.save_phrase(progress) {
            tracing::error!(error = %e, id = %progress.phrase_id, "Failed to persist phrase progress");
        }
    }

    pub(crate) fn persist_profile(&self) {
        if let Err(e) = self.snapshot.save_profile(&self.profile) {
            tracing::error!(error = %e, "Failed to persist profile stats");
        }
    }

    pub(crate) fn persist_achievement(&self, achievement: &Achievement) {
        if let Err(e) = self.snapshot.save_achievement(achievement) {
            tracing::error!(error = %e, id = %achievement.id, "Failed to persist achievement");
        }
    }

    pub(crate) fn persist_daily(&self) {
        if let Err(e) = self.snapshot.save_daily(&self.daily) {
            tracing::error!(error = %e, "Failed to persist daily progress");
        }
    }

}
