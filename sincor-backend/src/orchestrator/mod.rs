//! Orchestration facade - the single entry point for task assignment
//!
//! assign_task resolves the archetype and agent, appends the record;
//! complete_and_deliver generates and persists the artifact, then moves the
//! record to its terminal state. Both are synchronous: the caller gets the
//! finished record in one round trip. Constructed once in main and shared
//! via Arc - there is no global instance.

pub mod types;

pub use types::{ArchetypeStatus, BatchFailure, BatchItem, BatchOutcome, ReportDocument, StatusSnapshot};

use crate::agents::AgentRegistry;
use crate::artifacts::generator;
use crate::artifacts::{ArtifactSink, OutputArtifact};
use crate::dispatch::DispatchPolicy;
use crate::error::Result;
use crate::metrics::{self, MetricsSummary};
use crate::tasks::types::{TaskFilter, TaskRecord, TaskStatus};
use crate::tasks::TaskStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// How many ledger entries the report document carries
pub const RECENT_TASKS_IN_REPORT: usize = 10;

pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    policy: DispatchPolicy,
    store: TaskStore,
    sink: Arc<dyn ArtifactSink>,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        policy: DispatchPolicy,
        store: TaskStore,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        Self {
            registry,
            policy,
            store,
            sink,
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Resolve the archetype and agent for a task type and append the
    /// record with status `assigned`.
    pub fn assign_task(&self, task_type: &str, payload: Value) -> Result<TaskRecord> {
        let archetype = self.policy.resolve(task_type);
        let agent_id = self.policy.select_agent(archetype, &self.registry);

        let record = self
            .store
            .create(task_type, archetype, agent_id.as_deref(), payload)?;
        log::info!(
            "Assigned task {} ({}) to {} via {}",
            record.id,
            record.task_type,
            record.assigned_agent_id.as_deref().unwrap_or("<nobody>"),
            record.archetype
        );
        Ok(record)
    }

    /// Generate the output document, persist it, and mark the record
    /// completed. On a sink failure the record is marked failed with the
    /// error recorded, then the error propagates - a task is never left
    /// stuck at `assigned`.
    pub fn complete_and_deliver(
        &self,
        record: &TaskRecord,
    ) -> Result<(TaskRecord, OutputArtifact)> {
        if record.status.is_terminal() {
            return Err(crate::error::SincorError::InvalidState {
                task_id: record.id,
                reason: format!("already {}", record.status),
            });
        }

        let agent = record
            .assigned_agent_id
            .as_deref()
            .and_then(|id| self.registry.agent(id));
        let artifact = generator::generate(record, agent);

        if let Err(write_err) = self.sink.write(&artifact) {
            log::error!(
                "Artifact delivery failed for task {}: {}",
                record.id,
                write_err
            );
            if let Err(mark_err) = self.store.fail(record.id, &write_err.to_string()) {
                log::error!("Could not mark task {} failed: {}", record.id, mark_err);
            }
            return Err(write_err);
        }

        let updated = self.store.complete(record.id, serde_json::to_value(&artifact)?)?;
        Ok((updated, artifact))
    }

    /// assign_task + complete_and_deliver in one synchronous call.
    pub fn run_task(&self, task_type: &str, payload: Value) -> Result<(TaskRecord, OutputArtifact)> {
        let record = self.assign_task(task_type, payload)?;
        self.complete_and_deliver(&record)
    }

    /// Run every item, collecting per-item failures instead of aborting.
    pub fn run_batch(&self, items: &[BatchItem]) -> BatchOutcome {
        let started_at = Utc::now();
        let timer = std::time::Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let record = match self.assign_task(&item.task_type, item.payload.clone()) {
                Ok(record) => record,
                Err(e) => {
                    failures.push(BatchFailure {
                        index,
                        task_type: item.task_type.clone(),
                        task_id: None,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            match self.complete_and_deliver(&record) {
                Ok((completed, _artifact)) => successes.push(completed),
                Err(e) => failures.push(BatchFailure {
                    index,
                    task_type: item.task_type.clone(),
                    task_id: Some(record.id),
                    error: e.to_string(),
                }),
            }
        }

        let outcome = BatchOutcome {
            batch_id,
            requested: items.len(),
            successes,
            failures,
            duration_ms: timer.elapsed().as_millis() as i64,
            started_at,
        };
        log::info!(
            "Batch {}: {} of {} succeeded in {}ms",
            outcome.batch_id,
            outcome.successes.len(),
            outcome.requested,
            outcome.duration_ms
        );
        outcome
    }

    /// Roster summary plus the count of still-open tasks.
    pub fn status(&self) -> Result<StatusSnapshot> {
        let archetypes = self
            .registry
            .archetypes()
            .iter()
            .map(|rec| ArchetypeStatus {
                name: rec.name.to_string(),
                description: rec.description.clone(),
                agents: self.registry.agents_by_archetype(rec.name).len(),
            })
            .collect();

        let active_tasks = self
            .store
            .list(&TaskFilter::by_status(TaskStatus::Assigned))?
            .len();

        Ok(StatusSnapshot {
            total_agents: self.registry.len(),
            agents: self.registry.all_agent_ids(),
            archetypes,
            active_tasks,
            generated_at: Utc::now(),
        })
    }

    /// Metrics recomputed from the full ledger.
    pub fn metrics(&self) -> Result<MetricsSummary> {
        let tasks = self.store.list(&TaskFilter::default())?;
        Ok(metrics::summarize(&tasks))
    }

    /// Status, metrics, and the most recent ledger entries in one document.
    pub fn report(&self) -> Result<ReportDocument> {
        Ok(ReportDocument {
            status: self.status()?,
            metrics: self.metrics()?,
            recent_tasks: self.store.recent(RECENT_TASKS_IN_REPORT)?,
        })
    }
}
