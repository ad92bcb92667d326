//! Task record store - the lifecycle contract over the tasks table
//!
//! The ledger is append-only: records are created as `assigned` and move
//! exactly once to `completed` or `failed`. Double-terminalization is an
//! InvalidState error, not a silent no-op.

use crate::agents::Archetype;
use crate::db::Database;
use crate::error::{Result, SincorError};
use crate::tasks::types::{TaskFilter, TaskRecord, TaskStatus};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskStore {
    db: Arc<Database>,
}

impl TaskStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a new record with status `assigned`. Ids are allocated by the
    /// database and strictly increase for the life of the store.
    pub fn create(
        &self,
        task_type: &str,
        archetype: Archetype,
        agent_id: Option<&str>,
        payload: Value,
    ) -> Result<TaskRecord> {
        let created_at = Utc::now();
        let payload_json = serde_json::to_string(&payload)?;
        let id = self
            .db
            .insert_task(task_type, archetype, agent_id, &payload_json, created_at)?;

        // read back rather than hand-assembling, so callers always see
        // exactly what the ledger holds
        self.get(id)
    }

    /// Transition `assigned -> completed`, attaching the result.
    pub fn complete(&self, task_id: i64, result: Value) -> Result<TaskRecord> {
        let result_json = serde_json::to_string(&result)?;
        self.terminalize(task_id, TaskStatus::Completed, Some(&result_json), None)
    }

    /// Transition `assigned -> failed`, recording the delivery error.
    pub fn fail(&self, task_id: i64, error: &str) -> Result<TaskRecord> {
        self.terminalize(task_id, TaskStatus::Failed, None, Some(error))
    }

    fn terminalize(
        &self,
        task_id: i64,
        status: TaskStatus,
        result_json: Option<&str>,
        error: Option<&str>,
    ) -> Result<TaskRecord> {
        let updated =
            self.db
                .terminalize_task(task_id, status, result_json, error, Utc::now())?;
        if updated == 0 {
            // distinguish a missing record from an illegal transition
            return match self.db.get_task(task_id)? {
                None => Err(SincorError::TaskNotFound(task_id)),
                Some(record) => Err(SincorError::InvalidState {
                    task_id,
                    reason: format!("already {}", record.status),
                }),
            };
        }
        self.get(task_id)
    }

    pub fn get(&self, task_id: i64) -> Result<TaskRecord> {
        self.db
            .get_task(task_id)?
            .ok_or(SincorError::TaskNotFound(task_id))
    }

    /// Consistent snapshot scan, oldest first.
    pub fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskRecord>> {
        Ok(self.db.list_tasks(filter)?)
    }

    /// The most recent N records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<TaskRecord>> {
        Ok(self.db.recent_tasks(limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TaskStore {
        TaskStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_create_assigns_unique_increasing_ids() {
        let store = store();
        let mut ids = Vec::new();
        for _ in 0..50 {
            let record = store
                .create("analysis", Archetype::Auditor, Some("auditor-01"), json!({}))
                .unwrap();
            ids.push(record.id);
        }

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "ids must strictly increase");
        }
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_create_sets_assigned_state() {
        let store = store();
        let record = store
            .create(
                "research",
                Archetype::Scout,
                Some("scout-01"),
                json!({"topic": "competitors"}),
            )
            .unwrap();

        assert_eq!(record.status, TaskStatus::Assigned);
        assert_eq!(record.task_type, "research");
        assert_eq!(record.archetype, Archetype::Scout);
        assert_eq!(record.assigned_agent_id.as_deref(), Some("scout-01"));
        assert_eq!(record.payload["topic"], "competitors");
        assert!(record.result.is_none());
        assert!(record.completed_at.is_none());
    }

    #[test]
    fn test_complete_attaches_result_and_timestamp() {
        let store = store();
        let record = store
            .create("analysis", Archetype::Auditor, Some("auditor-01"), json!({}))
            .unwrap();

        let done = store.complete(record.id, json!({"insights": 3})).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.result.as_ref().unwrap()["insights"], 3);
        assert!(done.completed_at.is_some());
        assert!(done.completed_at.unwrap() >= done.created_at);
    }

    #[test]
    fn test_double_complete_is_invalid_state() {
        let store = store();
        let record = store
            .create("analysis", Archetype::Auditor, None, json!({}))
            .unwrap();
        store.complete(record.id, json!({})).unwrap();

        let err = store.complete(record.id, json!({})).unwrap_err();
        assert!(matches!(err, SincorError::InvalidState { .. }));
    }

    #[test]
    fn test_complete_unknown_task_is_not_found() {
        let store = store();
        let err = store.complete(9999, json!({})).unwrap_err();
        assert!(matches!(err, SincorError::TaskNotFound(9999)));
    }

    #[test]
    fn test_fail_records_error() {
        let store = store();
        let record = store
            .create("creation", Archetype::Builder, Some("builder-01"), json!({}))
            .unwrap();

        let failed = store.fail(record.id, "artifact write refused").unwrap();
        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("artifact write refused"));
        assert!(failed.completed_at.is_some());

        // failed is terminal too
        let err = store.complete(record.id, json!({})).unwrap_err();
        assert!(matches!(err, SincorError::InvalidState { .. }));
    }

    #[test]
    fn test_list_filters() {
        let store = store();
        let a = store
            .create("analysis", Archetype::Auditor, Some("auditor-01"), json!({}))
            .unwrap();
        store
            .create("creation", Archetype::Builder, Some("builder-01"), json!({}))
            .unwrap();
        store
            .create("analysis", Archetype::Auditor, Some("auditor-02"), json!({}))
            .unwrap();
        store.complete(a.id, json!({})).unwrap();

        assert_eq!(store.list(&TaskFilter::default()).unwrap().len(), 3);
        assert_eq!(
            store
                .list(&TaskFilter::by_status(TaskStatus::Completed))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .list(&TaskFilter {
                    task_type: Some("analysis".to_string()),
                    ..Default::default()
                })
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            store
                .list(&TaskFilter {
                    agent_id: Some("builder-01".to_string()),
                    ..Default::default()
                })
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .list(&TaskFilter {
                    limit: Some(2),
                    ..Default::default()
                })
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_recent_returns_newest_first() {
        let store = store();
        for task_type in ["analysis", "creation", "research"] {
            store
                .create(task_type, Archetype::Synthesizer, None, json!({}))
                .unwrap();
        }

        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].task_type, "research");
        assert_eq!(recent[1].task_type, "creation");
    }
}
