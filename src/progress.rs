#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The detector tools a scan job may run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Detector {
    /// Stanford MOSS.
    Moss,
    /// JPlag.
    Jplag,
}

impl Detector {
    /// Returns the tool name as it appears in record-store keys and deep
    /// links.
    pub fn as_str(&self) -> &'static str {
        match self {
            Detector::Moss => "moss",
            Detector::Jplag => "jplag",
        }
    }
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted status/progress pair for one scan job's detector run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Key of the record in the host's store.
    pub id:       i64,
    /// Stage label (upload, scanning, download, ...).
    pub status:   String,
    /// Percentage finished, stored as an integer.
    pub progress: i64,
}

/// Record store the progress handler reads and writes through.
///
/// Injected by the host so the handler stays decoupled from any concrete
/// database layer.
pub trait ProgressStore: Send + Sync {
    /// Loads the progress record for `detector` keyed by `id`.
    fn load(&self, detector: Detector, id: i64) -> Result<ProgressRecord>;
    /// Overwrites the progress record for `detector`.
    fn store(&self, detector: Detector, record: &ProgressRecord) -> Result<()>;
}

/// Reports scan progress into a persisted status record.
///
/// Bound at construction to one detector and one record; generic client
/// stubs call [`ProgressHandler::update_progress`] without knowing about
/// the store behind it. Updates are read-modify-write with no concurrency
/// protection; concurrent writers are last-write-wins.
pub struct ProgressHandler {
    /// Tool this handler reports for.
    detector: Detector,
    /// In-memory mirror of the persisted record.
    record:   ProgressRecord,
    /// Store the record is persisted through.
    store:    Arc<dyn ProgressStore>,
}

impl ProgressHandler {
    /// Binds a handler to a detector, its status record, and a store.
    pub fn new(detector: Detector, record: ProgressRecord, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            detector,
            record,
            store,
        }
    }

    /// Overwrites the persisted record's stage and progress (truncated to
    /// an integer), then mirrors both fields onto the in-memory record.
    ///
    /// No monotonicity or range validation is applied.
    pub fn update_progress(&mut self, stage: &str, progress: f64) -> Result<()> {
        let mut record = self.store.load(self.detector, self.record.id)?;
        record.status = stage.to_string();
        record.progress = progress.trunc() as i64;
        self.store.store(self.detector, &record)?;

        self.record.status = record.status;
        self.record.progress = record.progress;
        Ok(())
    }

    /// Returns the detector this handler reports for.
    pub fn detector(&self) -> Detector {
        self.detector
    }

    /// Returns the in-memory mirror of the status record.
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }
}
