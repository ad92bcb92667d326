//! Agent and archetype record types

use serde::{Deserialize, Serialize};

/// The closed archetype vocabulary used as dispatch-table targets.
///
/// An archetype is a coarse role tag, not a capability contract: dispatch
/// only ever compares it for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Auditor,
    Builder,
    Caretaker,
    Director,
    Negotiator,
    Scout,
    Synthesizer,
}

impl Archetype {
    pub fn all() -> Vec<Archetype> {
        vec![
            Archetype::Auditor,
            Archetype::Builder,
            Archetype::Caretaker,
            Archetype::Director,
            Archetype::Negotiator,
            Archetype::Scout,
            Archetype::Synthesizer,
        ]
    }

    pub fn from_str(s: &str) -> Option<Archetype> {
        match s.to_lowercase().as_str() {
            "auditor" => Some(Archetype::Auditor),
            "builder" => Some(Archetype::Builder),
            "caretaker" => Some(Archetype::Caretaker),
            "director" => Some(Archetype::Director),
            "negotiator" => Some(Archetype::Negotiator),
            "scout" => Some(Archetype::Scout),
            "synthesizer" => Some(Archetype::Synthesizer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Auditor => "Auditor",
            Archetype::Builder => "Builder",
            Archetype::Caretaker => "Caretaker",
            Archetype::Director => "Director",
            Archetype::Negotiator => "Negotiator",
            Archetype::Scout => "Scout",
            Archetype::Synthesizer => "Synthesizer",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single agent definition, loaded once at startup and immutable after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Unique id, stable for the process lifetime
    pub id: String,
    pub archetype: Archetype,
    /// Free-form capability descriptions, used for artifact scoring
    pub specialization: Vec<String>,
    /// Advisory lifecycle label ("Hatch", "Active", ...); dispatch ignores it
    pub status: String,
}

/// Display metadata for one archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeRecord {
    pub name: Archetype,
    pub description: String,
    pub capabilities: Vec<String>,
}
