use serde::{Deserialize, Serialize};

use crate::constants::{MASTERY_EASINESS_THRESHOLD, QUALITY_EASY, QUALITY_PASS_THRESHOLD};

/// Declarative XP reward amounts. All bonuses stack additively on top of the
/// review base; a failed recall earns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTable {
    pub review_base: u32,
    /// Bonus when the item's easiness (before the review) was below the
    /// mastery easiness threshold, i.e. the word is genuinely hard.
    pub hard_item_bonus: u32,
    /// Bonus for a quality-5 recall.
    pub perfect_recall_bonus: u32,
    /// Bonus the first time an item is ever answered correctly.
    pub first_correct_bonus: u32,
    pub phrase_practice: u32,
    pub phrase_learned: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            review_base: 10,
            hard_item_bonus: 5,
            perfect_recall_bonus: 5,
            first_correct_bonus: 10,
            phrase_practice: 5,
            phrase_learned: 15,
        }
    }
}

impl RewardTable {
    /// XP for one vocabulary review.
    ///
    /// `easiness_before` 是本次复习之前的难度系数，`first_correct` 表示该词
    /// 此前从未答对过。
    pub fn review_reward(&self, quality: u8, easiness_before: f64, first_correct: bool) -> u32 {
        if quality < QUALITY_PASS_THRESHOLD {
            return 0;
        }
        let mut xp = self.review_base;
        if easiness_before < MASTERY_EASINESS_THRESHOLD {
            xp += self.hard_item_bonus;
        }
        if quality >= QUALITY_EASY {
            xp += self.perfect_recall_bonus;
        }
        if first_correct {
            xp += self.first_correct_bonus;
        }
        xp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_review_earns_nothing() {
        let table = RewardTable::default();
        assert_eq!(table.review_reward(0, 1.5, true), 0);
        assert_eq!(table.review_reward(2, 1.5, true), 0);
    }

    #[test]
    fn base_reward_for_plain_correct() {
        let table = RewardTable::default();
        assert_eq!(table.review_reward(4, 2.5, false), 10);
    }

    #[test]
    fn bonuses_stack_additively() {
        let table = RewardTable::default();
        // hard item + perfect recall + first-ever-correct
        assert_eq!(table.review_reward(5, 1.6, true), 10 + 5 + 5 + 10);
    }

    #[test]
    fn hard_threshold_is_strict() {
        let table = RewardTable::default();
        assert_eq!(table.review_reward(4, MASTERY_EASINESS_THRESHOLD, false), 10);
    }
}
