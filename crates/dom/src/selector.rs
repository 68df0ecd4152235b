//! Tag-path selectors
//!
//! A selector such as `formalpara/para/screen` matches every element named
//! `screen` whose parent is a `para` whose parent is a `formalpara`. A step
//! may list alternatives with `|`, so `para/screen|programlisting` matches
//! either name in the last position.
//!
//! Selectors are always evaluated against the live tree, so a query issued
//! after a mutating pass sees that pass's renames and moves.

use smallvec::SmallVec;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::NodeId;

/// One `/`-separated step: a set of acceptable tag names
type Step = SmallVec<[String; 2]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Steps from outermost to innermost
    steps: Vec<Step>,
}

impl Selector {
    pub fn parse(path: &str) -> Result<Self> {
        let steps = path
            .split('/')
            .map(|step| {
                step.split('|')
                    .map(str::trim)
                    .map(|name| {
                        if name.is_empty() {
                            Err(DomError::InvalidSelector(path.to_string()))
                        } else {
                            Ok(name.to_string())
                        }
                    })
                    .collect::<Result<Step>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }

    /// True if `node_id` is an element whose name and parent chain match
    pub fn matches(&self, arena: &DomArena, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        for step in self.steps.iter().rev() {
            let Some(id) = current else {
                return false;
            };
            let Ok(node) = arena.get(id) else {
                return false;
            };
            if !node.is_element() || !step.iter().any(|name| *name == node.node_name) {
                return false;
            }
            current = node.parent_id;
        }
        true
    }

    /// All matching live nodes, in document order
    pub fn select(&self, arena: &DomArena) -> Vec<NodeId> {
        let Some(root_id) = arena.root_id() else {
            return Vec::new();
        };
        arena
            .descendants(root_id)
            .into_iter()
            .filter(|id| self.matches(arena, *id))
            .collect()
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl DomArena {
    /// Evaluate a tag path against the current tree.
    ///
    /// Paths are compile-time constants in practice; an unparsable one
    /// selects nothing in release builds and trips a debug assertion.
    pub fn select(&self, path: &str) -> Vec<NodeId> {
        match Selector::parse(path) {
            Ok(selector) => selector.select(self),
            Err(e) => {
                debug_assert!(false, "{e}");
                Vec::new()
            }
        }
    }
}
