mod common;

use common::fixtures::{new_item, open_store};
use tempfile::tempdir;

use lingua_core::store::local_today;

#[test]
fn everything_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let today = local_today();

    let (item_id, total_xp) = {
        let mut store = open_store(&dir);

        let item = store
            .add_vocabulary_item(new_item("fenetre"), today)
            .expect("add item");
        store.review_vocabulary_item(&item.id, 4, today);
        store.record_phrase_practice("phrase-window", true, today);
        store.mark_phrase_learned("phrase-window");
        store.update_practice_streak(today);
        store.unlock_achievement("first-word");
        store.record_session(7);

        store.flush().expect("flush");
        (item.id, store.profile().total_xp)
    };

    let store = open_store(&dir);

    let item = store.item(&item_id).expect("vocabulary item");
    assert_eq!(item.repetitions, 1);
    assert_eq!(item.times_correct, 1);
    assert!(item.last_reviewed_at.is_some());

    let phrase = store.phrase("phrase-window").expect("phrase progress");
    assert!(phrase.is_learned);
    assert_eq!(phrase.comfort_level, 5);
    assert_eq!(phrase.practiced_count, 1);

    assert_eq!(store.profile().total_xp, total_xp);
    assert_eq!(store.profile().current_streak, 1);
    assert_eq!(store.profile().practice_sessions, 1);
    assert!(store.achievement("first-word").expect("badge").unlocked);

    assert_eq!(store.daily().date, today);
    assert_eq!(store.daily().words_reviewed, 1);
    assert_eq!(store.daily().phrases_practiced, 1);
}

#[test]
fn deleted_item_stays_deleted_after_reopen() {
    let dir = tempdir().expect("tempdir");
    let today = local_today();

    let item_id = {
        let mut store = open_store(&dir);
        let item = store
            .add_vocabulary_item(new_item("ancien"), today)
            .expect("add item");
        assert!(store.delete_vocabulary_item(&item.id));
        store.flush().expect("flush");
        item.id
    };

    let store = open_store(&dir);
    assert!(store.item(&item_id).is_none());
}
