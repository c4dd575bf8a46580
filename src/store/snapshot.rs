use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;

use crate::store::types::{Achievement, DailyProgress, PhraseProgress, ProfileStats, VocabularyItem};
use crate::store::StoreError;

/// Logical tree names inside the local snapshot database.
pub mod trees {
    pub const VOCABULARY: &str = "vocabulary";
    pub const PHRASES: &str = "phrases";
    pub const PROFILE: &str = "profile";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const DAILY: &str = "daily";
}

/// 单例记录（profile / daily）在各自 tree 中的固定键
const SINGLETON_KEY: &str = "current";

/// Local persisted snapshot, one sled tree per logical store. Values are
/// JSON so dates round-trip as ISO-8601 strings and the layout stays
/// readable from other tooling.
#[derive(Debug)]
pub struct Snapshot {
    db: Db,
    vocabulary: sled::Tree,
    phrases: sled::Tree,
    profile: sled::Tree,
    achievements: sled::Tree,
    daily: sled::Tree,
}

impl Snapshot {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let vocabulary = db.open_tree(trees::VOCABULARY)?;
        let phrases = db.open_tree(trees::PHRASES)?;
        let profile = db.open_tree(trees::PROFILE)?;
        let achievements = db.open_tree(trees::ACHIEVEMENTS)?;
        let daily = db.open_tree(trees::DAILY)?;

        Ok(Self {
            db,
            vocabulary,
            phrases,
            profile,
            achievements,
            daily,
        })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn save_vocabulary_item(&self, item: &VocabularyItem) -> Result<(), StoreError> {
        self.vocabulary
            .insert(item.id.as_bytes(), Self::serialize(item)?)?;
        Ok(())
    }

    pub fn remove_vocabulary_item(&self, id: &str) -> Result<(), StoreError> {
        self.vocabulary.remove(id.as_bytes())?;
        Ok(())
    }

    pub fn load_vocabulary(&self) -> Result<Vec<VocabularyItem>, StoreError> {
        self.load_all(&self.vocabulary)
    }

    pub fn save_phrase(&self, progress: &PhraseProgress) -> Result<(), StoreError> {
        self.phrases
            .insert(progress.phrase_id.as_bytes(), Self::serialize(progress)?)?;
        Ok(())
    }

    pub fn load_phrases(&self) -> Result<Vec<PhraseProgress>, StoreError> {
        self.load_all(&self.phrases)
    }

    pub fn save_profile(&self, profile: &ProfileStats) -> Result<(), StoreError> {
        self.profile
            .insert(SINGLETON_KEY.as_bytes(), Self::serialize(profile)?)?;
        Ok(())
    }

    pub fn load_profile(&self) -> Result<Option<ProfileStats>, StoreError> {
        match self.profile.get(SINGLETON_KEY.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_achievement(&self, achievement: &Achievement) -> Result<(), StoreError> {
        self.achievements
            .insert(achievement.id.as_bytes(), Self::serialize(achievement)?)?;
        Ok(())
    }

    pub fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        self.load_all(&self.achievements)
    }

    pub fn save_daily(&self, daily: &DailyProgress) -> Result<(), StoreError> {
        self.daily
            .insert(SINGLETON_KEY.as_bytes(), Self::serialize(daily)?)?;
        Ok(())
    }

    pub fn load_daily(&self) -> Result<Option<DailyProgress>, StoreError> {
        match self.daily.get(SINGLETON_KEY.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    fn load_all<T: DeserializeOwned>(&self, tree: &sled::Tree) -> Result<Vec<T>, StoreError> {
        let mut values = Vec::new();
        for item in tree.iter() {
            let (_, raw) = item?;
            values.push(Self::deserialize(&raw)?);
        }
        Ok(values)
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn vocabulary_round_trips_with_iso_dates() {
        let dir = tempdir().unwrap();
        let snapshot = Snapshot::open(dir.path().join("snap.sled").to_str().unwrap()).unwrap();

        let mut item = VocabularyItem::new(
            "w1".into(),
            "bonjour".into(),
            "hello".into(),
            "greetings".into(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        item.last_reviewed_at = Some(Utc::now());
        snapshot.save_vocabulary_item(&item).unwrap();

        let loaded = snapshot.load_vocabulary().unwrap();
        assert_eq!(loaded, vec![item]);
    }

    #[test]
    fn profile_singleton_overwrites() {
        let dir = tempdir().unwrap();
        let snapshot = Snapshot::open(dir.path().join("snap.sled").to_str().unwrap()).unwrap();

        assert!(snapshot.load_profile().unwrap().is_none());

        let mut profile = ProfileStats::default();
        snapshot.save_profile(&profile).unwrap();
        profile.total_xp = 120;
        snapshot.save_profile(&profile).unwrap();

        let loaded = snapshot.load_profile().unwrap().unwrap();
        assert_eq!(loaded.total_xp, 120);
    }

    #[test]
    fn corrupted_value_surfaces_as_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.sled");
        let snapshot = Snapshot::open(path.to_str().unwrap()).unwrap();

        snapshot
            .vocabulary
            .insert(b"bad", b"not json".as_slice())
            .unwrap();

        assert!(snapshot.load_vocabulary().is_err());
    }
}
