use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(RunStatus::Running),
            "succeeded" => Ok(RunStatus::Succeeded),
            "failed" => Ok(RunStatus::Failed),
            _ => Err(format!(
                "Invalid run status '{}'. Valid options: running, succeeded, failed",
                s
            )),
        }
    }
}

/// One row of sync history. Created at run start, finalized once at run end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: Uuid,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub products_synced: i64,
    pub products_skipped: i64,
    pub errors: Vec<String>,
    /// Config snapshot, stats snapshot and outcome.
    pub metadata: Value,
}

impl SyncRun {
    pub fn start(id: Uuid, started_at: DateTime<Utc>, metadata: Value) -> Self {
        Self {
            id,
            status: RunStatus::Running,
            started_at,
            completed_at: None,
            products_synced: 0,
            products_skipped: 0,
            errors: Vec::new(),
            metadata,
        }
    }

    pub fn apply(&mut self, update: &SyncRunUpdate) {
        self.status = update.status;
        self.completed_at = Some(update.completed_at);
        self.products_synced = update.products_synced;
        self.products_skipped = update.products_skipped;
        self.errors = update.errors.clone();
        self.metadata = update.metadata.clone();
    }
}

/// Final values written when a run is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRunUpdate {
    pub status: RunStatus,
    pub completed_at: DateTime<Utc>,
    pub products_synced: i64,
    pub products_skipped: i64,
    pub errors: Vec<String>,
    pub metadata: Value,
}
