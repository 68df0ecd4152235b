//! Arena-based document tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! Every node lives in one `Vec<DomNode>` and is addressed by a `NodeId`.
//! Children are id lists, parents are plain ids. Re-parenting is a pure
//! structural operation: detach from the old parent's child list, attach to
//! the new one. Removed nodes stay in the arena but are unreachable from
//! the root, so every query walks the live tree rather than the raw vector.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Arena allocator for document nodes
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes ever created, attached or not
    nodes: Vec<DomNode>,

    /// Root element (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.add_node(DomNode::element(0, name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.add_node(DomNode::text(0, value))
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        let node = self.get(node_id)?;
        if !node.is_element() {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: node.node_name.clone(),
            });
        }
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Option<&DomNode> {
        self.root_id.and_then(|id| self.get(id).ok())
    }

    /// Tag name of an element, `None` for other node kinds or unknown ids
    pub fn name(&self, node_id: NodeId) -> Option<&str> {
        self.get(node_id).ok().and_then(|n| n.tag_name())
    }

    /// Child ids of a node, copied out so the caller may mutate the tree
    pub fn child_ids(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.get(node_id)?.children_ids.to_vec())
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent ID of a node
    pub fn parent_id(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent_id)
    }

    /// Sibling immediately before `node_id`, text nodes included
    pub fn previous_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            return Ok(None);
        };
        let siblings = &self.get(parent_id)?.children_ids;
        let pos = Self::position_in(siblings, node_id, parent_id)?;
        Ok(pos.checked_sub(1).map(|p| siblings[p]))
    }

    /// True if `ancestor` is `node_id` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).ok().and_then(|n| n.parent_id);
        }
        false
    }

    /// Unlink a node from its parent. No-op for nodes already detached.
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            if self.root_id == Some(node_id) {
                self.root_id = None;
            }
            return Ok(());
        };

        let parent = self.get_mut(parent_id)?;
        parent.children_ids.retain(|id| *id != node_id);
        self.get_mut(node_id)?.parent_id = None;
        Ok(())
    }

    /// Remove a node (and its subtree) from the live tree
    pub fn remove(&mut self, node_id: NodeId) -> Result<()> {
        self.detach(node_id)
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let len = self.get(parent_id)?.children_ids.len();
        self.insert_child(parent_id, len, child_id)
    }

    /// Move `child` into `parent` at `index` (clamped to the child count)
    pub fn insert_child(&mut self, parent_id: NodeId, index: usize, child_id: NodeId) -> Result<()> {
        debug_assert!(
            !self.is_ancestor(child_id, parent_id),
            "node {child_id} cannot become its own ancestor"
        );
        self.get(child_id)?;
        self.detach(child_id)?;

        let parent = self.get_mut(parent_id)?;
        let index = index.min(parent.children_ids.len());
        parent.children_ids.insert(index, child_id);
        self.get_mut(child_id)?.parent_id = Some(parent_id);
        Ok(())
    }

    /// Move `node` so it becomes the sibling immediately before `reference`
    pub fn insert_before(&mut self, reference: NodeId, node_id: NodeId) -> Result<()> {
        self.insert_relative(reference, node_id, 0)
    }

    /// Move `node` so it becomes the sibling immediately after `reference`
    pub fn insert_after(&mut self, reference: NodeId, node_id: NodeId) -> Result<()> {
        self.insert_relative(reference, node_id, 1)
    }

    fn insert_relative(&mut self, reference: NodeId, node_id: NodeId, offset: usize) -> Result<()> {
        if reference == node_id {
            return Ok(());
        }
        // Detach first: the node may currently sit before `reference`.
        self.detach(node_id)?;
        let parent_id = self
            .get(reference)?
            .parent_id
            .ok_or(DomError::Detached(reference))?;
        let pos = Self::position_in(&self.get(parent_id)?.children_ids, reference, parent_id)?;
        self.insert_child(parent_id, pos + offset, node_id)
    }

    fn position_in(siblings: &[NodeId], node_id: NodeId, parent_id: NodeId) -> Result<usize> {
        siblings
            .iter()
            .position(|id| *id == node_id)
            .ok_or(DomError::NodeNotFound(parent_id))
    }

    /// Rename an element. Renaming a text node is an error.
    pub fn rename(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_element() {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: node.node_name.clone(),
            });
        }
        node.node_name = name.to_string();
        Ok(())
    }

    /// Get attribute value
    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.get(node_id).ok().and_then(|n| n.attr(name))
    }

    /// Set (or overwrite) an attribute
    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        self.get_mut(node_id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Remove an attribute, keeping the order of the rest. Absent is fine.
    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.get_mut(node_id)?.attributes.shift_remove(name))
    }

    /// Rename an attribute in place, keeping its position
    pub fn rename_attr(&mut self, node_id: NodeId, from: &str, to: &str) -> Result<bool> {
        let attributes = &mut self.get_mut(node_id)?.attributes;
        let Some(index) = attributes.get_index_of(from) else {
            return Ok(false);
        };
        let Some((_, value)) = attributes.shift_remove_index(index) else {
            return Ok(false);
        };
        attributes.shift_insert(index, to.to_string(), value);
        Ok(true)
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// All ids reachable from `start_id`, in document order
    pub fn descendants(&self, start_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let walked = self.traverse_df(start_id, |node| {
            out.push(node.node_id);
            Ok(())
        });
        debug_assert!(walked.is_ok(), "dangling child id below node {start_id}");
        out
    }

    /// Find live nodes matching predicate, in document order
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        let Some(root_id) = self.root_id else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let walked = self.traverse_df(root_id, |node| {
            if predicate(node) {
                found.push(node.node_id);
            }
            Ok(())
        });
        debug_assert!(walked.is_ok(), "dangling child id in live tree");
        found
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_by_type(arena: &DomArena, node_type: NodeType) -> usize {
        arena
            .root_id()
            .map(|root| {
                arena
                    .descendants(root)
                    .into_iter()
                    .filter(|id| arena.get(*id).map(|n| n.node_type == node_type).unwrap_or(false))
                    .count()
            })
            .unwrap_or(0)
    }

    /// root -> [a, b, c]
    fn sample() -> (DomArena, [NodeId; 4]) {
        let mut arena = DomArena::new();
        let root = arena.create_element("root");
        let a = arena.create_element("a");
        let b = arena.create_element("b");
        let c = arena.create_element("c");
        arena.set_root(root).unwrap();
        for id in [a, b, c] {
            arena.append_child(root, id).unwrap();
        }
        (arena, [root, a, b, c])
    }

    fn names(arena: &DomArena, parent: NodeId) -> Vec<String> {
        arena
            .children(parent)
            .unwrap()
            .iter()
            .map(|n| n.node_name.clone())
            .collect()
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();
        let id = arena.create_element("div");
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert_eq!(retrieved.node_id, 0);
        assert!(matches!(arena.get(42), Err(DomError::NodeNotFound(42))));
    }

    #[test]
    fn test_append_sets_parent() {
        let (arena, [root, a, _, c]) = sample();
        assert_eq!(arena.parent_id(a).unwrap(), Some(root));
        assert_eq!(names(&arena, root), vec!["a", "b", "c"]);
        assert_eq!(arena.previous_sibling(c).unwrap(), Some(2));
        assert_eq!(arena.previous_sibling(a).unwrap(), None);
    }

    #[test]
    fn test_reparent_detaches_from_old_parent() {
        let (mut arena, [root, a, b, c]) = sample();
        arena.append_child(a, c).unwrap();

        assert_eq!(names(&arena, root), vec!["a", "b"]);
        assert_eq!(names(&arena, a), vec!["c"]);
        assert_eq!(arena.parent_id(c).unwrap(), Some(a));

        arena.insert_before(a, c).unwrap();
        assert_eq!(names(&arena, root), vec!["c", "a", "b"]);
        assert!(arena.children(a).unwrap().is_empty());

        arena.insert_after(b, c).unwrap();
        assert_eq!(names(&arena, root), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_child_clamps_index() {
        let (mut arena, [root, ..]) = sample();
        let d = arena.create_element("d");
        arena.insert_child(root, 99, d).unwrap();
        assert_eq!(names(&arena, root), vec!["a", "b", "c", "d"]);

        let e = arena.create_element("e");
        arena.insert_child(root, 1, e).unwrap();
        assert_eq!(names(&arena, root), vec!["a", "e", "b", "c", "d"]);
    }

    #[test]
    fn test_removed_nodes_are_not_found() {
        let (mut arena, [_, _, b, _]) = sample();
        arena.set_attr(b, "id", "target").unwrap();
        let by_id = |arena: &DomArena| arena.find(|n| n.attr("id") == Some("target"));
        assert_eq!(by_id(&arena), vec![b]);

        arena.remove(b).unwrap();
        assert!(by_id(&arena).is_empty());
        assert!(arena.find(|n| n.is_named("b")).is_empty());
        // Still addressable, just unreachable
        assert_eq!(arena.get(b).unwrap().node_name, "b");
    }

    #[test]
    fn test_attribute_ops_preserve_order() {
        let (mut arena, [_, a, ..]) = sample();
        arena.set_attr(a, "language", "ruby").unwrap();
        arena.set_attr(a, "linenumbering", "unnumbered").unwrap();
        arena.set_attr(a, "role", "x").unwrap();

        assert!(arena.rename_attr(a, "language", "format").unwrap());
        assert!(!arena.rename_attr(a, "missing", "other").unwrap());
        assert_eq!(arena.remove_attr(a, "linenumbering").unwrap().as_deref(), Some("unnumbered"));
        assert_eq!(arena.remove_attr(a, "linenumbering").unwrap(), None);

        let keys: Vec<_> = arena.get(a).unwrap().attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["format", "role"]);
    }

    #[test]
    fn test_traverse_df_document_order() {
        let (mut arena, [root, a, b, _]) = sample();
        let t = arena.create_text("hi");
        arena.append_child(a, t).unwrap();
        arena.append_child(a, b).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["root", "a", "#text", "b", "c"]);
        assert_eq!(count_by_type(&arena, NodeType::Text), 1);
    }

    #[test]
    #[should_panic(expected = "dangling child id")]
    fn test_dangling_child_is_not_skipped() {
        let (mut arena, [root, ..]) = sample();
        arena.get_mut(root).unwrap().children_ids.push(99);
        arena.descendants(root);
    }

    #[test]
    fn test_rename_text_is_rejected() {
        let mut arena = DomArena::new();
        let t = arena.create_text("x");
        assert!(arena.rename(t, "para").is_err());
        assert!(arena.set_root(t).is_err());
    }
}
