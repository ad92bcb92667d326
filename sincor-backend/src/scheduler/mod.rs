//! Interval scheduler - the autonomous heartbeat
//!
//! A plain timer loop that submits a maintenance task through the same
//! synchronous facade the HTTP layer uses. No priorities, no backpressure,
//! no cron expressions - one tick, one task. Disabled by default.

use crate::orchestrator::Orchestrator;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Minutes between heartbeat tasks; 0 disables the scheduler
    pub heartbeat_interval_minutes: u64,
    /// Task type submitted on each tick
    pub heartbeat_task_type: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_minutes: 0,
            heartbeat_task_type: "maintenance".to_string(),
        }
    }
}

pub struct Scheduler {
    orchestrator: Arc<Orchestrator>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<Orchestrator>, config: SchedulerConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.heartbeat_interval_minutes > 0
    }

    /// Run until the shutdown channel fires. Ticks are skipped entirely
    /// when the scheduler is disabled.
    pub async fn start(self: Arc<Self>, mut shutdown: oneshot::Receiver<()>) {
        if !self.enabled() {
            log::info!("Scheduler disabled (heartbeat interval is 0)");
            return;
        }

        let period = Duration::from_secs(self.config.heartbeat_interval_minutes * 60);
        let mut ticker = tokio::time::interval(period);
        // the first interval tick fires immediately; swallow it so the
        // first heartbeat lands one full period after startup
        ticker.tick().await;

        log::info!(
            "Scheduler started: '{}' task every {} minute(s)",
            self.config.heartbeat_task_type,
            self.config.heartbeat_interval_minutes
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => self.beat(),
            }
        }
    }

    fn beat(&self) {
        let payload = json!({ "source": "heartbeat" });
        match self
            .orchestrator
            .run_task(&self.config.heartbeat_task_type, payload)
        {
            Ok((record, _artifact)) => {
                log::info!(
                    "Heartbeat task {} completed by {}",
                    record.id,
                    record.assigned_agent_id.as_deref().unwrap_or("<nobody>")
                );
            }
            Err(e) => log::error!("Heartbeat task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_means_disabled() {
        let config = SchedulerConfig::default();
        assert_eq!(config.heartbeat_interval_minutes, 0);
        assert_eq!(config.heartbeat_task_type, "maintenance");
    }
}
