use chrono::{NaiveDate, Utc};

use crate::constants::{MAX_COMFORT_LEVEL, MIN_COMFORT_LEVEL};
use crate::store::types::PhraseProgress;
use crate::store::ProgressStore;

impl ProgressStore {
    /// Record one phrase practice on `today`. Progress is created lazily on
    /// first practice; comfort moves one step up or down within `[1, 5]`.
    pub fn record_phrase_practice(&mut self, phrase_id: &str, correct: bool, today: NaiveDate) {
        self.roll_daily_if_needed(today);

        let progress = self
            .phrases
            .entry(phrase_id.to_string())
            .or_insert_with(|| PhraseProgress::new(phrase_id.to_string()));

        progress.practiced_count += 1;
        progress.last_practiced = Some(Utc::now());
        progress.comfort_level = if correct {
            (progress.comfort_level + 1).min(MAX_COMFORT_LEVEL)
        } else {
            progress.comfort_level.saturating_sub(1).max(MIN_COMFORT_LEVEL)
        };

        let snapshot = progress.clone();
        self.persist_phrase(&snapshot);

        self.profile.phrases_practiced += 1;
        self.profile.updated_at = Utc::now();
        self.persist_profile();

        self.daily.phrases_practiced += 1;
        self.persist_daily();

        let xp = self.rewards.phrase_practice;
        if correct && xp > 0 {
            self.add_xp(xp);
        } else {
            self.mark_dirty();
        }
    }

    /// Mark a phrase learned: sets the flag and forces comfort to 5. Learned
    /// XP is granted only on the first transition.
    pub fn mark_phrase_learned(&mut self, phrase_id: &str) {
        let progress = self
            .phrases
            .entry(phrase_id.to_string())
            .or_insert_with(|| PhraseProgress::new(phrase_id.to_string()));

        let first_time = !progress.is_learned;
        progress.is_learned = true;
        progress.comfort_level = MAX_COMFORT_LEVEL;
        progress.last_practiced = Some(Utc::now());

        let snapshot = progress.clone();
        self.persist_phrase(&snapshot);

        if first_time {
            let xp = self.rewards.phrase_learned;
            if xp > 0 {
                self.add_xp(xp);
                return;
            }
        }
        self.mark_dirty();
    }

    /// Clear the learned flag. Comfort level is left where it is. Unknown
    /// ids are a no-op.
    pub fn mark_phrase_unlearned(&mut self, phrase_id: &str) {
        let Some(progress) = self.phrases.get_mut(phrase_id) else {
            return;
        };
        if !progress.is_learned {
            return;
        }
        progress.is_learned = false;
        progress.last_practiced = Some(Utc::now());

        let snapshot = progress.clone();
        self.persist_phrase(&snapshot);
        self.mark_dirty();
    }

    pub fn learned_phrase_count(&self) -> usize {
        self.phrases.values().filter(|p| p.is_learned).count()
    }
}
