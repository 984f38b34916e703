use serde::Serialize;

/// A row of the `sync_runs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncRun {
    pub id: i64,
    pub domain: String,
    pub started_at: String,
    /// `None` while running, or forever if the run aborted.
    pub finished_at: Option<String>,
    pub created: i64,
    pub updated: i64,
    pub failed: i64,
    pub remote_complete: bool,
}

impl SyncRun {
    pub fn is_open(&self) -> bool {
        self.finished_at.is_none()
    }
}
