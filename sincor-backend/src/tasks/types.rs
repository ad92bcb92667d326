//! Task record types

use crate::agents::Archetype;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a task record.
///
/// Creation and assignment are a single store operation and delivery is
/// synchronous in the same call, so there is no observable pending or
/// running state. `Failed` records a delivery error instead of leaving the
/// record stuck at `Assigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Assigned,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn from_str(s: &str) -> Option<TaskStatus> {
        match s.to_lowercase().as_str() {
            "assigned" => Some(TaskStatus::Assigned),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "assigned",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the append-only task ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Strictly increasing, unique for the life of the store
    pub id: i64,
    /// Caller-supplied kind of work ("analysis", "creation", ...)
    pub task_type: String,
    /// Resolved at assignment time from the routing table
    pub archetype: Archetype,
    pub assigned_agent_id: Option<String>,
    pub status: TaskStatus,
    /// Caller-supplied opaque key/value data
    pub payload: Value,
    /// Structured output, attached on completion
    pub result: Option<Value>,
    /// Delivery error, recorded on failure
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Stamped on the terminal transition (completed or failed)
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Wall-clock time from creation to terminal transition
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|done| done - self.created_at)
    }
}

/// Filter for scanning the ledger
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub task_type: Option<String>,
    pub agent_id: Option<String>,
    pub limit: Option<usize>,
}

impl TaskFilter {
    pub fn by_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
