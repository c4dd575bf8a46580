use crate::store::{ProgressStore, RemoteState};
use crate::sync::merge::{self, MergeWinner};
use crate::xp;

impl ProgressStore {
    /// Merge entry point for pulled remote state. Per-entity most-recent-wins;
    /// entities present only remotely are adopted, entities present only
    /// locally are kept (and flagged for the next push). Returns true when
    /// any local-only or local-won state remains to be pushed.
    pub fn merge_remote(&mut self, incoming: RemoteState) -> bool {
        let mut local_ahead = false;

        if let Some(remote_profile) = incoming.profile {
            match merge::merge_profile(&self.profile, &remote_profile) {
                MergeWinner::Remote => {
                    self.profile = remote_profile;
                    // 远端数据也要满足派生字段与不变量
                    self.profile.current_level = xp::calculate_level(self.profile.total_xp);
                    self.profile.current_rank = xp::calculate_rank(self.profile.current_level);
                    self.profile.longest_streak =
                        self.profile.longest_streak.max(self.profile.current_streak);
                    self.persist_profile();
                }
                MergeWinner::Local => local_ahead = true,
            }
        } else {
            // first-time user remotely; everything local is ahead
            local_ahead = true;
        }

        let mut remote_vocab_ids = std::collections::HashSet::new();
        for remote_item in incoming.vocabulary {
            remote_vocab_ids.insert(remote_item.id.clone());
            let winner = match self.vocabulary.get(&remote_item.id) {
                None => MergeWinner::Remote,
                Some(local_item) => merge::merge_vocabulary(local_item, &remote_item),
            };
            match winner {
                MergeWinner::Remote => {
                    self.persist_item(&remote_item);
                    self.vocabulary.insert(remote_item.id.clone(), remote_item);
                }
                MergeWinner::Local => local_ahead = true,
            }
        }
        if self.vocabulary.keys().any(|id| !remote_vocab_ids.contains(id)) {
            local_ahead = true;
        }

        let mut remote_phrase_ids = std::collections::HashSet::new();
        for remote_phrase in incoming.phrases {
            remote_phrase_ids.insert(remote_phrase.phrase_id.clone());
            let winner = match self.phrases.get(&remote_phrase.phrase_id) {
                None => MergeWinner::Remote,
                Some(local_phrase) => merge::merge_phrase(local_phrase, &remote_phrase),
            };
            match winner {
                MergeWinner::Remote => {
                    self.persist_phrase(&remote_phrase);
                    self.phrases
                        .insert(remote_phrase.phrase_id.clone(), remote_phrase);
                }
                MergeWinner::Local => local_ahead = true,
            }
        }
        if self.phrases.keys().any(|id| !remote_phrase_ids.contains(id)) {
            local_ahead = true;
        }

        if let Some(remote_daily) = incoming.daily {
            if remote_daily.date > self.daily.date {
                self.daily = remote_daily;
                self.persist_daily();
            } else if remote_daily.date == self.daily.date {
                // counters are monotonic within a day, so field-wise max is
                // the union of both devices' activity
                self.daily.xp_earned = self.daily.xp_earned.max(remote_daily.xp_earned);
                self.daily.words_reviewed =
                    self.daily.words_reviewed.max(remote_daily.words_reviewed);
                self.daily.phrases_practiced = self
                    .daily
                    .phrases_practiced
                    .max(remote_daily.phrases_practiced);
                self.persist_daily();
            }
        }

        if local_ahead {
            self.mark_dirty();
        }
        local_ahead
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};
    use tempfile::tempdir;

    use crate::store::types::{NewVocabularyItem, ProfileStats, VocabularyItem};
    use crate::store::RemoteState;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn open_store(dir: &tempfile::TempDir) -> ProgressStore {
        ProgressStore::open(dir.path().join("db").to_str().unwrap()).unwrap()
    }

    #[test]
    fn newer_remote_item_replaces_local() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);
        let today = d(2025, 6, 1);

        let local = store
            .add_vocabulary_item(
                NewVocabularyItem {
                    front: "soleil".into(),
                    back: "sun".into(),
                    phonetic: None,
                    category: "nature".into(),
                    example: None,
                },
                today,
            )
            .unwrap();

        let mut remote = local.clone();
        remote.repetitions = 4;
        remote.last_reviewed_at = Some(Utc::now() + Duration::hours(1));

        store.merge_remote(RemoteState {
            vocabulary: vec![remote.clone()],
            ..Default::default()
        });
        assert_eq!(store.item(&local.id).unwrap().repetitions, 4);
    }

    #[test]
    fn older_remote_item_is_ignored_and_flags_push() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);
        let today = d(2025, 6, 1);

        let item = store
            .add_vocabulary_item(
                NewVocabularyItem {
                    front: "pluie".into(),
                    back: "rain".into(),
                    phonetic: None,
                    category: "nature".into(),
                    example: None,
                },
                today,
            )
            .unwrap();
        store.review_vocabulary_item(&item.id, 5, today);

        let mut remote = item.clone();
        remote.repetitions = 9;
        remote.last_reviewed_at = Some(Utc::now() - Duration::days(2));

        let local_ahead = store.merge_remote(RemoteState {
            vocabulary: vec![remote],
            ..Default::default()
        });
        assert!(local_ahead);
        assert_eq!(store.item(&item.id).unwrap().repetitions, 1);
    }

    #[test]
    fn remote_only_entities_are_adopted() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);

        let remote_item = VocabularyItem::new(
            "remote-1".into(),
            "vent".into(),
            "wind".into(),
            "nature".into(),
            d(2025, 6, 1),
        );

        store.merge_remote(RemoteState {
            vocabulary: vec![remote_item],
            ..Default::default()
        });
        assert!(store.item("remote-1").is_some());
    }

    #[test]
    fn remote_profile_rederives_level_and_streak_invariant() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);

        let remote_profile = ProfileStats {
            total_xp: 500,
            current_level: 1, // stale derived field from the other device
            current_streak: 9,
            longest_streak: 4, // violates the invariant on purpose
            updated_at: Utc::now() + Duration::hours(1),
            ..Default::default()
        };

        store.merge_remote(RemoteState {
            profile: Some(remote_profile),
            ..Default::default()
        });

        assert_eq!(store.profile().total_xp, 500);
        assert_eq!(store.profile().current_level, 3);
        assert_eq!(store.profile().longest_streak, 9);
    }

    #[test]
    fn missing_remote_profile_keeps_local_and_flags_push() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);
        store.add_xp(100);

        let local_ahead = store.merge_remote(RemoteState::default());
        assert!(local_ahead);
        assert_eq!(store.profile().total_xp, 100);
    }
}
