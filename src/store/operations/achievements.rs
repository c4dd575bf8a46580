use chrono::Utc;

use crate::store::types::{Achievement, AchievementKind};
use crate::store::ProgressStore;

/// 静态成就目录。id 稳定，升级时只增不改。
pub fn default_catalog() -> Vec<Achievement> {
    fn entry(id: &str, title: &str, kind: AchievementKind, threshold: u64, xp: u32) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            threshold,
            xp_reward: xp,
            unlocked: false,
            earned_at: None,
        }
    }

    vec![
        entry("first-word", "First Word", AchievementKind::WordsLearned, 1, 10),
        entry("word-collector", "Word Collector", AchievementKind::WordsLearned, 25, 50),
        entry("lexicon-builder", "Lexicon Builder", AchievementKind::WordsLearned, 100, 150),
        entry("phrase-starter", "Phrase Starter", AchievementKind::PhrasesPracticed, 10, 25),
        entry("phrase-master", "Phrase Master", AchievementKind::PhrasesPracticed, 100, 100),
        entry("week-streak", "One Week Streak", AchievementKind::Streak, 7, 30),
        entry("month-streak", "One Month Streak", AchievementKind::Streak, 30, 100),
        entry("xp-1000", "Millennium", AchievementKind::TotalXp, 1000, 50),
        entry("xp-10000", "Ten Thousand Club", AchievementKind::TotalXp, 10_000, 200),
        entry("regular", "Regular", AchievementKind::PracticeSessions, 50, 75),
    ]
}

impl ProgressStore {
    /// One-way unlock. Returns the unlocked achievement on the first call and
    /// `None` for unknown ids or repeat calls; the XP reward is granted
    /// exactly once.
    pub fn unlock_achievement(&mut self, id: &str) -> Option<Achievement> {
        let achievement = self.achievements.get_mut(id)?;
        if achievement.unlocked {
            return None;
        }
        achievement.unlocked = true;
        achievement.earned_at = Some(Utc::now());
        let unlocked = achievement.clone();

        self.persist_achievement(&unlocked);
        tracing::info!(id, title = %unlocked.title, "Achievement unlocked");

        if unlocked.xp_reward > 0 {
            self.add_xp(unlocked.xp_reward);
        } else {
            self.mark_dirty();
        }
        Some(unlocked)
    }

    /// Unlock every locked achievement whose requirement the current stats
    /// already satisfy. Returns the newly unlocked ones.
    pub fn check_achievements(&mut self) -> Vec<Achievement> {
        let eligible: Vec<String> = self
            .achievements
            .values()
            .filter(|a| !a.unlocked && a.requirement_met(&self.profile))
            .map(|a| a.id.clone())
            .collect();

        eligible
            .into_iter()
            .filter_map(|id| self.unlock_achievement(&id))
            .collect()
    }
}
