//! Sequential upload of generated records.

use serde::Serialize;
use tracing::{error, info, warn};
use vitals_core::HealthEvent;
use vitals_records::event_to_document;

use crate::store::{health_records_path, DocumentStore};

/// Cumulative failed writes that abort an upload.
pub const MAX_WRITE_FAILURES: usize = 3;
/// Progress is logged every this many successful writes.
pub const PROGRESS_LOG_INTERVAL: usize = 10;

const PERMISSION_HINT: &str =
    "no permission to write health records; check the document store security rules";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum UploadStatus {
    Completed,
    Aborted(String),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadReport {
    pub total: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub status: UploadStatus,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.status == UploadStatus::Completed
    }

    /// One-line status for display.
    pub fn message(&self) -> String {
        match &self.status {
            UploadStatus::Completed => {
                format!("uploaded {} of {} records", self.uploaded, self.total)
            }
            UploadStatus::Aborted(reason) => {
                format!(
                    "upload aborted after {} of {} records: {reason}",
                    self.uploaded, self.total
                )
            }
        }
    }
}

/// Write `events` one at a time into the user's health record collection.
///
/// Each event is normalized and stripped of absent fields before the write.
/// `on_progress(uploaded, total)` runs after every successful write. Failed
/// writes are counted across the whole upload and the upload stops once
/// [`MAX_WRITE_FAILURES`] is reached.
pub async fn upload_events<F>(
    store: &dyn DocumentStore,
    user_id: &str,
    events: &[HealthEvent],
    mut on_progress: F,
) -> UploadReport
where
    F: FnMut(usize, usize),
{
    let path = health_records_path(user_id);
    let total = events.len();
    let mut uploaded = 0usize;
    let mut failed = 0usize;

    for event in events {
        let written = match event_to_document(event) {
            Ok(document) => store.add_doc(&path, document).await.map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match written {
            Ok(_) => {
                uploaded += 1;
                on_progress(uploaded, total);
                if uploaded % PROGRESS_LOG_INTERVAL == 0 {
                    info!(uploaded, total, "uploading health records");
                }
            }
            Err(err) => {
                failed += 1;
                warn!(user_id, failed, error = %err, "failed to write health record");
                if failed >= MAX_WRITE_FAILURES {
                    error!(user_id, uploaded, total, "aborting upload after repeated write failures");
                    return UploadReport {
                        total,
                        uploaded,
                        failed,
                        status: UploadStatus::Aborted(PERMISSION_HINT.to_string()),
                    };
                }
            }
        }
    }

    info!(user_id, uploaded, failed, total, "upload finished");
    UploadReport {
        total,
        uploaded,
        failed,
        status: UploadStatus::Completed,
    }
}
