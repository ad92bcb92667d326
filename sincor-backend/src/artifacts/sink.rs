//! Artifact persistence - one JSON document per completed task
//!
//! The sink is a trait so delivery can be pointed somewhere else (or made
//! to fail) in tests; production uses the filesystem sink.

use crate::artifacts::OutputArtifact;
use crate::error::{Result, SincorError};
use std::path::PathBuf;

pub trait ArtifactSink: Send + Sync {
    /// Persist the artifact, addressed by its task id. Returns the location
    /// written. Re-writing the same task id overwrites deterministically.
    fn write(&self, artifact: &OutputArtifact) -> Result<PathBuf>;
}

/// Writes `task-{id}.json` under the artifact directory.
pub struct FileArtifactSink {
    dir: PathBuf,
}

impl FileArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, task_id: i64) -> PathBuf {
        self.dir.join(format!("task-{}.json", task_id))
    }

    /// Read back a persisted artifact; Ok(None) when none was written.
    pub fn load(&self, task_id: i64) -> Result<Option<OutputArtifact>> {
        let path = self.path_for(task_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

impl ArtifactSink for FileArtifactSink {
    fn write(&self, artifact: &OutputArtifact) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SincorError::ArtifactWrite {
            task_id: artifact.task_id,
            source: e,
        })?;

        let path = self.path_for(artifact.task_id);
        let json = serde_json::to_string_pretty(artifact)?;
        std::fs::write(&path, json).map_err(|e| SincorError::ArtifactWrite {
            task_id: artifact.task_id,
            source: e,
        })?;

        log::debug!("Wrote artifact for task {} to {}", artifact.task_id, path.display());
        Ok(path)
    }
}

/// True when an artifact has been persisted for the task id.
#[cfg(test)]
pub fn artifact_exists(dir: &std::path::Path, task_id: i64) -> bool {
    dir.join(format!("task-{}.json", task_id)).exists()
}
