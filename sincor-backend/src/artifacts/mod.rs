//! Output artifacts - the structured result document for a completed task

pub mod generator;
pub mod sink;

pub use sink::{ArtifactSink, FileArtifactSink};

use crate::agents::Archetype;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scoring scheme identifier carried on every artifact, so the scores can
/// never be mistaken for measured telemetry.
pub const SCORE_METHOD: &str = "heuristic-v1";

/// The structured output document, one-to-one with a completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub task_id: i64,
    pub task_type: String,
    pub archetype: Archetype,
    pub agent_id: Option<String>,
    pub title: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Deterministic heuristic in 0..=100; see `score_method`
    pub quality_score: u32,
    /// Deterministic heuristic in 0..=100; see `score_method`
    pub efficiency_score: u32,
    /// Always `"heuristic-v1"`; names the scheme the scores come from
    pub score_method: String,
    /// Echoes the task's creation time so regeneration is byte-identical
    pub generated_at: DateTime<Utc>,
}
