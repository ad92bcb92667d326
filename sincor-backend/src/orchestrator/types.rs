//! Orchestrator input/output types

use crate::metrics::MetricsSummary;
use crate::tasks::types::TaskRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn empty_payload() -> Value {
    serde_json::json!({})
}

/// One entry in a batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub task_type: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

/// A batch item that did not make it to a completed task
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Position of the item in the submitted batch
    pub index: usize,
    pub task_type: String,
    /// Set when the task record was created before delivery failed
    pub task_id: Option<i64>,
    pub error: String,
}

/// Outcome of a batch run; individual failures never abort the batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub requested: usize,
    pub successes: Vec<TaskRecord>,
    pub failures: Vec<BatchFailure>,
    pub duration_ms: i64,
    pub started_at: DateTime<Utc>,
}

/// Per-archetype roster line in the status snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeStatus {
    pub name: String,
    pub description: String,
    pub agents: usize,
}

/// Live view of the roster and the ledger's open work
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub total_agents: usize,
    /// Agent ids in registry order
    pub agents: Vec<String>,
    pub archetypes: Vec<ArchetypeStatus>,
    pub active_tasks: usize,
    pub generated_at: DateTime<Utc>,
}

/// Full snapshot document served by the report endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub status: StatusSnapshot,
    pub metrics: MetricsSummary,
    pub recent_tasks: Vec<TaskRecord>,
}
