//! Dispatch policy - maps task types to archetypes and picks a concrete agent
//!
//! Pure with respect to the registry snapshot: no side effects, no hidden
//! randomness, so repeated calls return the same agent for the same input.

use crate::agents::{AgentRegistry, Archetype};

/// Size of the default pool borrowed from when an archetype has no agents
pub const FALLBACK_POOL_SIZE: usize = 5;

/// Fixed task-type routing table
const ROUTING: &[(&str, Archetype)] = &[
    ("analysis", Archetype::Auditor),
    ("creation", Archetype::Builder),
    ("maintenance", Archetype::Caretaker),
    ("coordination", Archetype::Director),
    ("sales", Archetype::Negotiator),
    ("research", Archetype::Scout),
    ("integration", Archetype::Synthesizer),
];

/// Resolves task types to archetypes and archetypes to agent ids.
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    default_archetype: Archetype,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            default_archetype: Archetype::Synthesizer,
        }
    }
}

impl DispatchPolicy {
    pub fn new(default_archetype: Archetype) -> Self {
        Self { default_archetype }
    }

    /// Resolve a task type to its target archetype.
    ///
    /// Unknown task types resolve to the default archetype - a policy
    /// decision, not an error.
    pub fn resolve(&self, task_type: &str) -> Archetype {
        ROUTING
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(task_type))
            .map(|(_, archetype)| *archetype)
            .unwrap_or(self.default_archetype)
    }

    /// Pick the agent for an archetype: the first agent in the registry's
    /// stable order. An archetype with no agents borrows from the default
    /// pool (the first FALLBACK_POOL_SIZE registry entries), indexed by the
    /// archetype's position in the vocabulary so fallback assignments spread
    /// across the pool without randomness. Returns None only for an empty
    /// registry, which the loader already rejects.
    pub fn select_agent(&self, archetype: Archetype, registry: &AgentRegistry) -> Option<String> {
        if let Some(agent) = registry.agents_by_archetype(archetype).first() {
            return Some(agent.id.clone());
        }

        let pool: Vec<_> = registry
            .all_agents()
            .iter()
            .take(FALLBACK_POOL_SIZE)
            .collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[archetype as usize % pool.len()].id.clone())
    }
}
