use chrono::{NaiveDate, Utc};

use crate::constants::QUALITY_PASS_THRESHOLD;
use crate::srs::{mastery, scheduler};
use crate::store::types::{CatalogEntry, NewVocabularyItem, VocabularyItem};
use crate::store::{ProgressStore, StoreError};
use crate::validation;

impl ProgressStore {
    /// Add a user-authored item. Malformed input is rejected synchronously
    /// and never enters the store.
    pub fn add_vocabulary_item(
        &mut self,
        input: NewVocabularyItem,
        today: NaiveDate,
    ) -> Result<VocabularyItem, StoreError> {
        validation::validate_front(&input.front).map_err(StoreError::Validation)?;
        validation::validate_back(&input.back).map_err(StoreError::Validation)?;

        let mut item = VocabularyItem::new(
            uuid::Uuid::new_v4().to_string(),
            input.front.trim().to_string(),
            input.back.trim().to_string(),
            input.category,
            today,
        );
        item.phonetic = input.phonetic;
        item.example = input.example;

        self.persist_item(&item);
        self.vocabulary.insert(item.id.clone(), item.clone());
        self.mark_dirty();
        Ok(item)
    }

    /// Bulk-seed from the static catalog. Existing ids keep their scheduling
    /// state; returns how many new items were added.
    pub fn seed_catalog(&mut self, entries: &[CatalogEntry], today: NaiveDate) -> usize {
        let mut added = 0;
        for entry in entries {
            if self.vocabulary.contains_key(&entry.id) {
                continue;
            }
            let mut item = VocabularyItem::new(
                entry.id.clone(),
                entry.front.clone(),
                entry.back.clone(),
                entry.category.clone(),
                today,
            );
            item.phonetic = entry.phonetic.clone();
            item.example = entry.example.clone();
            self.persist_item(&item);
            self.vocabulary.insert(item.id.clone(), item);
            added += 1;
        }
        if added > 0 {
            tracing::info!(added, "Seeded vocabulary catalog");
            self.mark_dirty();
        }
        added
    }

    /// Explicit user delete. Unknown ids are a no-op.
    pub fn delete_vocabulary_item(&mut self, id: &str) -> bool {
        if self.vocabulary.remove(id).is_none() {
            return false;
        }
        self.persist_item_removal(id);
        self.mark_dirty();
        true
    }

    /// Record one review: SM-2 reschedule, counters, mastery recompute and
    /// the XP reward. Returns the XP delta; an unknown id returns 0 since the
    /// item may have been deleted between the UI reading it and rating it.
    pub fn review_vocabulary_item(&mut self, id: &str, quality: u8, today: NaiveDate) -> u32 {
        self.roll_daily_if_needed(today);

        let Some(item) = self.vocabulary.get_mut(id) else {
            tracing::debug!(id, "Review for unknown vocabulary item ignored");
            return 0;
        };

        let correct = quality >= QUALITY_PASS_THRESHOLD;
        let easiness_before = item.easiness;
        let first_correct = correct && item.times_correct == 0;
        let was_mastered = item.mastered;

        let schedule = scheduler::compute_next_review(
            quality,
            item.easiness,
            item.interval_days,
            item.repetitions,
            today,
        );
        item.easiness = schedule.easiness;
        item.interval_days = schedule.interval_days;
        item.repetitions = schedule.repetitions;
        item.next_review_date = schedule.next_review_date;
        if correct {
            item.times_correct += 1;
        } else {
            item.times_incorrect += 1;
        }
        item.mastered = mastery::is_mastered(
            item.repetitions,
            item.easiness,
            item.times_correct,
            item.times_incorrect,
        );
        item.last_reviewed_at = Some(Utc::now());

        let became_mastered = !was_mastered && item.mastered;
        let item_snapshot = item.clone();
        self.persist_item(&item_snapshot);

        self.daily.words_reviewed += 1;
        self.persist_daily();

        if became_mastered {
            self.profile.words_learned += 1;
            self.profile.updated_at = Utc::now();
            self.persist_profile();
            tracing::info!(id, "Vocabulary item mastered");
        }

        let xp = self
            .rewards
            .review_reward(quality, easiness_before, first_correct);
        if xp > 0 {
            self.add_xp(xp);
        } else {
            self.mark_dirty();
        }
        xp
    }

    /// Items due on or before `today`, most overdue first.
    pub fn due_items(&self, today: NaiveDate) -> Vec<&VocabularyItem> {
        let mut due: Vec<&VocabularyItem> = self
            .vocabulary
            .values()
            .filter(|item| mastery::is_due(item.next_review_date, today))
            .collect();
        due.sort_by_key(|item| item.next_review_date);
        due
    }

    /// Derived mastery percentage for one item; unknown ids read as 0.
    pub fn item_mastery_percent(&self, id: &str) -> f64 {
        self.vocabulary
            .get(id)
            .map(|item| {
                mastery::mastery_percent(item.times_correct, item.times_incorrect, item.repetitions)
            })
            .unwrap_or(0.0)
    }
}
