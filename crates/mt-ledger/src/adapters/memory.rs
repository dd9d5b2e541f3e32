//! In-memory adapters for the snapshot store and the notification sink.

use crate::errors::SnapshotError;
use crate::events::{LedgerEvent, LedgerEventRecord};
use crate::ports::outbound::{EventSink, SnapshotStore};
use parking_lot::Mutex;
use std::sync::RwLock;

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// In-memory implementation of SnapshotStore, keeping the latest snapshot
pub struct InMemorySnapshotStore {
    latest: RwLock<Option<Vec<u8>>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
        }
    }

    /// Returns true once a snapshot has been saved.
    pub fn has_snapshot(&self) -> Result<bool, SnapshotError> {
        let latest = self
            .latest
            .read()
            .map_err(|_| SnapshotError::LockPoisoned)?;
        Ok(latest.is_some())
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, bytes: Vec<u8>) -> Result<(), SnapshotError> {
        let mut latest = self
            .latest
            .write()
            .map_err(|_| SnapshotError::LockPoisoned)?;
        *latest = Some(bytes);
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, SnapshotError> {
        let latest = self
            .latest
            .read()
            .map_err(|_| SnapshotError::LockPoisoned)?;
        latest.clone().ok_or(SnapshotError::NotFound)
    }
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Sink that keeps every published record in order.
#[derive(Default)]
pub struct InMemoryEventLog {
    records: Mutex<Vec<LedgerEventRecord>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record published so far.
    pub fn records(&self) -> Vec<LedgerEventRecord> {
        self.records.lock().clone()
    }

    /// Events only, without envelopes.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.records
            .lock()
            .iter()
            .map(|record| record.event.clone())
            .collect()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<LedgerEvent> {
        self.records.lock().last().map(|record| record.event.clone())
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, record: &LedgerEventRecord) {
        self.records.lock().push(record.clone());
    }
}
