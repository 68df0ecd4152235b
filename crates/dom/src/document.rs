//! Document: a tree plus the bits of prolog that survive a round trip

use crate::arena::DomArena;
use crate::types::NodeId;

/// An owned tree with at most one root element.
///
/// Created fresh for each conversion and dropped once serialized.
#[derive(Debug, Clone, Default)]
pub struct Document {
    arena: DomArena,

    /// Default namespace written on the root element
    pub namespace: Option<String>,

    /// `standalone` value from the input XML declaration, if any
    pub standalone: Option<String>,
}

impl Document {
    pub fn new(arena: DomArena) -> Self {
        Self {
            arena,
            namespace: None,
            standalone: None,
        }
    }

    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.arena.root_id()
    }

    /// Tag name of the root element
    pub fn root_name(&self) -> Option<&str> {
        self.root_id().and_then(|id| self.arena.name(id))
    }
}
