use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use moss_utils::{Detector, ProgressHandler, ProgressRecord, ProgressStore};

/// In-memory record store standing in for the host's database layer.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<HashMap<(Detector, i64), ProgressRecord>>,
}

impl MemoryStore {
    fn seed(&self, detector: Detector, record: ProgressRecord) {
        self.records
            .lock()
            .expect("store poisoned")
            .insert((detector, record.id), record);
    }

    fn get(&self, detector: Detector, id: i64) -> Option<ProgressRecord> {
        self.records.lock().expect("store poisoned").get(&(detector, id)).cloned()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, detector: Detector, id: i64) -> Result<ProgressRecord> {
        self.get(detector, id)
            .with_context(|| format!("No {detector} record with id {id}"))
    }

    fn store(&self, detector: Detector, record: &ProgressRecord) -> Result<()> {
        self.seed(detector, record.clone());
        Ok(())
    }
}

fn fresh_record() -> ProgressRecord {
    ProgressRecord {
        id:       7,
        status:   "pending".to_string(),
        progress: 0,
    }
}

#[test]
fn update_truncates_and_mirrors() {
    let store = Arc::new(MemoryStore::default());
    store.seed(Detector::Moss, fresh_record());

    let mut handler = ProgressHandler::new(Detector::Moss, fresh_record(), store.clone());
    handler.update_progress("scanning", 45.7).expect("update should succeed");

    let persisted = store.get(Detector::Moss, 7).expect("record should exist");
    assert_eq!(persisted.status, "scanning");
    assert_eq!(persisted.progress, 45);
    assert_eq!(handler.record().status, "scanning");
    assert_eq!(handler.record().progress, 45);
}

#[test]
fn updates_are_scoped_to_the_bound_detector() {
    let store = Arc::new(MemoryStore::default());
    store.seed(Detector::Moss, fresh_record());
    store.seed(Detector::Jplag, fresh_record());

    let mut handler = ProgressHandler::new(Detector::Jplag, fresh_record(), store.clone());
    handler.update_progress("upload", 10.0).expect("update should succeed");

    let moss = store.get(Detector::Moss, 7).expect("moss record");
    assert_eq!(moss.status, "pending");
    let jplag = store.get(Detector::Jplag, 7).expect("jplag record");
    assert_eq!(jplag.status, "upload");
}

#[test]
fn update_fails_when_the_record_is_missing() {
    let store = Arc::new(MemoryStore::default());
    let mut handler = ProgressHandler::new(Detector::Moss, fresh_record(), store);
    let err = handler.update_progress("scanning", 1.0).expect_err("missing record should fail");
    assert!(err.to_string().contains("No moss record"));
}

#[test]
fn no_range_validation_is_applied() {
    let store = Arc::new(MemoryStore::default());
    store.seed(Detector::Moss, fresh_record());

    let mut handler = ProgressHandler::new(Detector::Moss, fresh_record(), store.clone());
    handler.update_progress("download", 250.9).expect("update should succeed");
    assert_eq!(store.get(Detector::Moss, 7).expect("record").progress, 250);
}
