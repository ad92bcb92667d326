//! Agent registry - loads agent and archetype definitions from the config
//! directory and serves them read-only for the life of the process.
//!
//! The registry refuses to start on a missing or malformed source, an agent
//! naming an unknown archetype, a duplicate agent id, or an empty roster.
//! Dispatch over zero agents is meaningless, so there is no degraded mode.

use crate::agents::types::{AgentRecord, Archetype, ArchetypeRecord};
use crate::error::{Result, SincorError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Raw agent definition as it appears in agents.ron, before validation
#[derive(Debug, Clone, Deserialize)]
struct AgentDef {
    id: String,
    archetype: String,
    #[serde(default)]
    specialization: Vec<String>,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "Hatch".to_string()
}

/// Raw archetype definition as it appears in archetypes.ron
#[derive(Debug, Clone, Deserialize)]
struct ArchetypeDef {
    name: String,
    description: String,
    #[serde(default)]
    capabilities: Vec<String>,
}

/// Immutable, queryable handle over the loaded definitions.
///
/// Shared via `Arc` without locking; definition order is preserved so that
/// agent selection is reproducible for a given registry snapshot.
#[derive(Debug)]
pub struct AgentRegistry {
    agents: Vec<AgentRecord>,
    by_id: HashMap<String, usize>,
    archetypes: Vec<ArchetypeRecord>,
}

impl AgentRegistry {
    /// Load and validate all definitions from the config directory.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let agents_path = config_dir.join("agents.ron");
        let archetypes_path = config_dir.join("archetypes.ron");

        let agents_raw = std::fs::read_to_string(&agents_path).map_err(|e| {
            SincorError::Configuration(format!("cannot read {}: {}", agents_path.display(), e))
        })?;
        let archetypes_raw = std::fs::read_to_string(&archetypes_path).map_err(|e| {
            SincorError::Configuration(format!("cannot read {}: {}", archetypes_path.display(), e))
        })?;

        let agent_defs: Vec<AgentDef> = ron::from_str(&agents_raw).map_err(|e| {
            SincorError::Configuration(format!("cannot parse {}: {}", agents_path.display(), e))
        })?;
        let archetype_defs: Vec<ArchetypeDef> = ron::from_str(&archetypes_raw).map_err(|e| {
            SincorError::Configuration(format!("cannot parse {}: {}", archetypes_path.display(), e))
        })?;

        let mut agents = Vec::with_capacity(agent_defs.len());
        for def in agent_defs {
            let archetype = Archetype::from_str(&def.archetype).ok_or_else(|| {
                SincorError::Configuration(format!(
                    "agent '{}' names unknown archetype '{}'",
                    def.id, def.archetype
                ))
            })?;
            agents.push(AgentRecord {
                id: def.id,
                archetype,
                specialization: def.specialization,
                status: def.status,
            });
        }

        let mut archetypes = Vec::with_capacity(archetype_defs.len());
        for def in archetype_defs {
            let name = Archetype::from_str(&def.name).ok_or_else(|| {
                SincorError::Configuration(format!("unknown archetype '{}'", def.name))
            })?;
            archetypes.push(ArchetypeRecord {
                name,
                description: def.description,
                capabilities: def.capabilities,
            });
        }

        let registry = Self::from_records(agents, archetypes)?;
        log::info!(
            "Loaded {} agents across {} archetypes from {}",
            registry.len(),
            registry.archetypes.len(),
            config_dir.display()
        );
        Ok(registry)
    }

    /// Build a registry from already-validated records. Definition order is
    /// kept as the registry's stable order.
    pub fn from_records(
        agents: Vec<AgentRecord>,
        archetypes: Vec<ArchetypeRecord>,
    ) -> Result<Self> {
        if agents.is_empty() {
            return Err(SincorError::Configuration(
                "agent roster is empty - refusing to start with zero agents".to_string(),
            ));
        }

        let mut by_id = HashMap::with_capacity(agents.len());
        for (idx, agent) in agents.iter().enumerate() {
            if by_id.insert(agent.id.clone(), idx).is_some() {
                return Err(SincorError::Configuration(format!(
                    "duplicate agent id '{}'",
                    agent.id
                )));
            }
        }

        for archetype in Archetype::all() {
            if !agents.iter().any(|a| a.archetype == archetype) {
                log::warn!("archetype {} has no agents; dispatch will fall back", archetype);
            }
        }

        Ok(Self {
            agents,
            by_id,
            archetypes,
        })
    }

    pub fn agent(&self, id: &str) -> Option<&AgentRecord> {
        self.by_id.get(id).map(|idx| &self.agents[*idx])
    }

    /// All agents of one archetype, in definition order.
    pub fn agents_by_archetype(&self, archetype: Archetype) -> Vec<&AgentRecord> {
        self.agents
            .iter()
            .filter(|a| a.archetype == archetype)
            .collect()
    }

    /// All agents in definition order.
    pub fn all_agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn all_agent_ids(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    pub fn archetypes(&self) -> &[ArchetypeRecord] {
        &self.archetypes
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const AGENTS_RON: &str = r#"[
    (id: "auditor-01", archetype: "Auditor", specialization: ["ledger review"], status: "Active"),
    (id: "builder-01", archetype: "Builder", specialization: ["content assembly"]),
    (id: "auditor-02", archetype: "Auditor"),
]"#;

    const ARCHETYPES_RON: &str = r#"[
    (name: "Auditor", description: "Reviews and verifies", capabilities: ["analysis"]),
    (name: "Builder", description: "Creates deliverables", capabilities: ["creation"]),
]"#;

    fn write_config(dir: &Path, agents: &str, archetypes: &str) {
        fs::write(dir.join("agents.ron"), agents).unwrap();
        fs::write(dir.join("archetypes.ron"), archetypes).unwrap();
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), AGENTS_RON, ARCHETYPES_RON);

        let registry = AgentRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.archetypes().len(), 2);

        let agent = registry.agent("auditor-01").unwrap();
        assert_eq!(agent.archetype, Archetype::Auditor);
        assert_eq!(agent.status, "Active");

        // omitted fields take defaults
        let hatchling = registry.agent("auditor-02").unwrap();
        assert_eq!(hatchling.status, "Hatch");
        assert!(hatchling.specialization.is_empty());
    }

    #[test]
    fn test_agents_by_archetype_keeps_definition_order() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), AGENTS_RON, ARCHETYPES_RON);

        let registry = AgentRegistry::load(dir.path()).unwrap();
        let auditors = registry.agents_by_archetype(Archetype::Auditor);
        assert_eq!(auditors.len(), 2);
        assert_eq!(auditors[0].id, "auditor-01");
        assert_eq!(auditors[1].id, "auditor-02");

        // stable across calls
        let again = registry.agents_by_archetype(Archetype::Auditor);
        assert_eq!(again[0].id, "auditor-01");
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let err = AgentRegistry::load(Path::new("/nonexistent/config")).unwrap_err();
        assert!(matches!(err, SincorError::Configuration(_)));
    }

    #[test]
    fn test_malformed_ron_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[(id: \"a1\", archetype:", ARCHETYPES_RON);

        let err = AgentRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(err, SincorError::Configuration(_)));
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"[(id: "a1", archetype: "Overlord")]"#,
            ARCHETYPES_RON,
        );

        let err = AgentRegistry::load(dir.path()).unwrap_err();
        match err {
            SincorError::Configuration(msg) => assert!(msg.contains("Overlord")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_agent_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"[
    (id: "a1", archetype: "Auditor"),
    (id: "a1", archetype: "Builder"),
]"#,
            ARCHETYPES_RON,
        );

        let err = AgentRegistry::load(dir.path()).unwrap_err();
        match err {
            SincorError::Configuration(msg) => assert!(msg.contains("duplicate")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_roster_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[]", ARCHETYPES_RON);

        let err = AgentRegistry::load(dir.path()).unwrap_err();
        match err {
            SincorError::Configuration(msg) => assert!(msg.contains("empty")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }
}
