pub mod deleted;
pub mod document;
pub mod error;
pub mod pins;
pub mod progress;
pub mod selections;
pub mod services;

use std::time::Duration;

use crate::config::{ScanConfig, StorageConfig};
use document::DocumentStore;

/// All persisted dashboard state. One JSON document per entity in the data
/// directory, plus a compatibility copy of the services list in the legacy
/// directory for older clients.
///
/// Nothing is cached between operations; every call is a fresh
/// read-modify-write cycle against the filesystem.
pub struct DashboardStore {
    docs: DocumentStore,
    legacy: DocumentStore,
    stale_after: Duration,
}

impl DashboardStore {
    pub fn new(storage: &StorageConfig, scan: &ScanConfig) -> Self {
        Self {
            docs: DocumentStore::new(&storage.data_dir, storage.lock_timeout_ms),
            legacy: DocumentStore::new(&storage.legacy_dir, storage.lock_timeout_ms),
            stale_after: Duration::from_secs(scan.stale_after_secs),
        }
    }
}
