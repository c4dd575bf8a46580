use chrono::NaiveDate;
use tempfile::TempDir;

use lingua_core::store::types::{CatalogEntry, NewVocabularyItem};
use lingua_core::store::ProgressStore;

pub fn open_store(dir: &TempDir) -> ProgressStore {
    ProgressStore::open(dir.path().join("progress.sled").to_str().expect("utf-8 path"))
        .expect("open progress store")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn new_item(front: &str) -> NewVocabularyItem {
    NewVocabularyItem {
        front: front.to_string(),
        back: format!("meaning of {front}"),
        phonetic: None,
        category: "test".to_string(),
        example: None,
    }
}

pub fn catalog_entries(count: usize) -> Vec<CatalogEntry> {
    (0..count)
        .map(|idx| CatalogEntry {
            id: format!("cat-{idx}"),
            front: format!("word-{idx}"),
            back: format!("meaning-{idx}"),
            phonetic: None,
            category: "seed".to_string(),
            example: None,
        })
        .collect()
}
