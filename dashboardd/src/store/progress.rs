use chrono::Utc;

use shared::protocol::DOC_SCAN_PROGRESS;
use shared::types::{ScanProgress, ScanStatus};

use crate::store::document::DocumentRead;
use crate::store::DashboardStore;

impl DashboardStore {
    /// Classify the progress record the external scanner writes.
    ///
    /// A record older than the staleness threshold is reported as idle no
    /// matter what it says; a scanner that crashed mid-run leaves a
    /// "running" record behind and must not pin the UI forever. A record
    /// without a timestamp skips the check and is reported verbatim.
    pub fn scan_progress(&self) -> ScanProgress {
        let record = match self.docs.read_document::<ScanProgress>(DOC_SCAN_PROGRESS) {
            DocumentRead::Missing => {
                return ScanProgress::synthesized(ScanStatus::Idle, "No scan in progress");
            }
            DocumentRead::Invalid => {
                return ScanProgress::synthesized(ScanStatus::Error, "Invalid progress data");
            }
            DocumentRead::Found(record) => record,
        };

        if let Some(timestamp) = record.timestamp {
            let age = Utc::now() - timestamp;
            if age.num_seconds() > self.stale_after.as_secs() as i64 {
                return ScanProgress::synthesized(ScanStatus::Idle, "No recent scan activity");
            }
        }

        record
    }
}
