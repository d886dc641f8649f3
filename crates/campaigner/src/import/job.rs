use serde::{Deserialize, Serialize};

/// Status of a bulk import job, as reported by the import service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportJobStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl ImportJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportJobStatus::Success | ImportJobStatus::Failed)
    }
}

/// Row counts reported by the import service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub imported: u64,
    #[serde(default)]
    pub failed: u64,
}

/// A bulk import job, created once per bulk-import submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: String,
    pub status: ImportJobStatus,
    #[serde(default)]
    pub counts: ImportCounts,
    /// Failure message, set when status is FAILED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
