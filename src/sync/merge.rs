use chrono::{DateTime, Utc};

use crate::store::types::{PhraseProgress, ProfileStats, VocabularyItem};

/// Which side of a conflict survives a most-recent-wins merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeWinner {
    Local,
    Remote,
}

/// Ties favor the remote copy since the remote store is the durable one.
pub fn pick_by_recency(local: DateTime<Utc>, remote: DateTime<Utc>) -> MergeWinner {
    if remote >= local {
        MergeWinner::Remote
    } else {
        MergeWinner::Local
    }
}

/// Recency for vocabulary is the last review, falling back to creation time.
pub fn merge_vocabulary(local: &VocabularyItem, remote: &VocabularyItem) -> MergeWinner {
    pick_by_recency(local.activity_timestamp(), remote.activity_timestamp())
}

/// Recency for phrases is the last practice; a never-practiced side loses to
/// a practiced one, and two never-practiced copies resolve to remote.
pub fn merge_phrase(local: &PhraseProgress, remote: &PhraseProgress) -> MergeWinner {
    match (local.last_practiced, remote.last_practiced) {
        (Some(l), Some(r)) => pick_by_recency(l, r),
        (Some(_), None) => MergeWinner::Local,
        _ => MergeWinner::Remote,
    }
}

/// Profile recency is its explicit modification timestamp.
pub fn merge_profile(local: &ProfileStats, remote: &ProfileStats) -> MergeWinner {
    pick_by_recency(local.updated_at, remote.updated_at)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use super::*;

    fn item(last_reviewed: Option<DateTime<Utc>>) -> VocabularyItem {
        let mut item = VocabularyItem::new(
            "w1".into(),
            "front".into(),
            "back".into(),
            "cat".into(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        item.last_reviewed_at = last_reviewed;
        item
    }

    #[test]
    fn newer_remote_wins() {
        let now = Utc::now();
        let local = item(Some(now - Duration::hours(2)));
        let remote = item(Some(now));
        assert_eq!(merge_vocabulary(&local, &remote), MergeWinner::Remote);
    }

    #[test]
    fn newer_local_wins() {
        let now = Utc::now();
        let local = item(Some(now));
        let remote = item(Some(now - Duration::hours(2)));
        assert_eq!(merge_vocabulary(&local, &remote), MergeWinner::Local);
    }

    #[test]
    fn exact_tie_favors_remote() {
        let now = Utc::now();
        assert_eq!(pick_by_recency(now, now), MergeWinner::Remote);
    }

    #[test]
    fn unreviewed_item_falls_back_to_added_at() {
        let mut local = item(None);
        let remote = item(None);
        local.added_at = remote.added_at - Duration::hours(1);
        assert_eq!(merge_vocabulary(&local, &remote), MergeWinner::Remote);
    }

    #[test]
    fn practiced_phrase_beats_unpracticed() {
        let mut local = PhraseProgress::new("p1".into());
        local.last_practiced = Some(Utc::now());
        let remote = PhraseProgress::new("p1".into());
        assert_eq!(merge_phrase(&local, &remote), MergeWinner::Local);
        assert_eq!(merge_phrase(&remote, &local), MergeWinner::Remote);
    }
}
