pub mod registry;
pub mod types;

pub use registry::AgentRegistry;
pub use types::{AgentRecord, Archetype, ArchetypeRecord};
