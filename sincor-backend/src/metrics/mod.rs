//! Metrics aggregation - a pure fold over the task ledger
//!
//! There are no live counters anywhere in the system; every number here is
//! recomputed from the store's contents, so the summary cannot drift from
//! the records it describes.

use crate::tasks::types::{TaskRecord, TaskStatus};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_tasks: usize,
    pub by_type: HashMap<String, usize>,
    pub by_archetype: HashMap<String, usize>,
    pub by_agent: HashMap<String, usize>,
    pub completed: usize,
    pub failed: usize,
    /// completed / total, in percent. Defined as 100.0 for an empty ledger.
    pub success_rate: f64,
    /// Mean creation-to-completion time over completed tasks; None when
    /// nothing has completed yet.
    pub avg_duration_ms: Option<f64>,
}

pub fn summarize(tasks: &[TaskRecord]) -> MetricsSummary {
    let mut by_type: HashMap<String, usize> = HashMap::new();
    let mut by_archetype: HashMap<String, usize> = HashMap::new();
    let mut by_agent: HashMap<String, usize> = HashMap::new();
    let mut completed = 0usize;
    let mut failed = 0usize;
    let mut duration_total_ms = 0i64;
    let mut duration_samples = 0usize;

    for task in tasks {
        *by_type.entry(task.task_type.clone()).or_insert(0) += 1;
        *by_archetype
            .entry(task.archetype.as_str().to_string())
            .or_insert(0) += 1;
        if let Some(ref agent) = task.assigned_agent_id {
            *by_agent.entry(agent.clone()).or_insert(0) += 1;
        }

        match task.status {
            TaskStatus::Completed => {
                completed += 1;
                if let Some(duration) = task.duration() {
                    duration_total_ms += duration.num_milliseconds();
                    duration_samples += 1;
                }
            }
            TaskStatus::Failed => failed += 1,
            TaskStatus::Assigned => {}
        }
    }

    let total_tasks = tasks.len();
    let success_rate = if total_tasks == 0 {
        100.0
    } else {
        completed as f64 / total_tasks as f64 * 100.0
    };
    let avg_duration_ms = if duration_samples == 0 {
        None
    } else {
        Some(duration_total_ms as f64 / duration_samples as f64)
    };

    MetricsSummary {
        total_tasks,
        by_type,
        by_archetype,
        by_agent,
        completed,
        failed,
        success_rate,
        avg_duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Archetype;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn task(
        id: i64,
        task_type: &str,
        archetype: Archetype,
        agent: Option<&str>,
        status: TaskStatus,
        duration_ms: Option<i64>,
    ) -> TaskRecord {
        let created_at = Utc::now();
        TaskRecord {
            id,
            task_type: task_type.to_string(),
            archetype,
            assigned_agent_id: agent.map(|s| s.to_string()),
            status,
            payload: json!({}),
            result: None,
            error: None,
            created_at,
            completed_at: duration_ms.map(|ms| created_at + Duration::milliseconds(ms)),
        }
    }

    #[test]
    fn test_empty_ledger_is_a_perfect_record() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.success_rate, 100.0);
        assert!(summary.avg_duration_ms.is_none());
        assert!(summary.by_type.is_empty());
    }

    #[test]
    fn test_counts_and_rates() {
        let tasks = vec![
            task(1, "analysis", Archetype::Auditor, Some("auditor-01"), TaskStatus::Completed, Some(100)),
            task(2, "analysis", Archetype::Auditor, Some("auditor-01"), TaskStatus::Completed, Some(300)),
            task(3, "creation", Archetype::Builder, Some("builder-01"), TaskStatus::Failed, Some(50)),
            task(4, "research", Archetype::Scout, None, TaskStatus::Assigned, None),
        ];

        let summary = summarize(&tasks);
        assert_eq!(summary.total_tasks, 4);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(summary.by_type["analysis"], 2);
        assert_eq!(summary.by_archetype["Auditor"], 2);
        assert_eq!(summary.by_agent["auditor-01"], 2);
        // unassigned tasks don't appear in by_agent
        assert_eq!(summary.by_agent.values().sum::<usize>(), 3);
        // failed-task duration is excluded from the average
        assert_eq!(summary.avg_duration_ms, Some(200.0));
    }
}
