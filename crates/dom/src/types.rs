//! Core type definitions for the document tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Parent links are plain indices, never ownership
//! 3. Use SmallVec for child lists (most nodes have few children)
//! 4. Attributes keep document order (IndexMap, not HashMap)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Ordered attribute map, name → value
pub type Attributes = IndexMap<String, String>;

/// Node kinds kept in the tree, numbered as in the DOM.
///
/// Doctypes are dropped at parse time; everything else inside the root
/// element survives a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    CData = 4,
    ProcessingInstruction = 7,
    Comment = 8,
}

/// The main tree node structure
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - `parent_id` is a lookup aid; the arena owns every node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Tag name for elements, target for processing instructions, `#text`
    /// style names for the rest
    pub node_name: String,
    /// Character data for non-element nodes, empty for elements
    pub node_value: String,
    pub attributes: Attributes,
}

impl DomNode {
    /// Create a detached element
    pub fn element(node_id: NodeId, node_name: impl Into<String>) -> Self {
        Self {
            node_id,
            node_type: NodeType::Element,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: Attributes::new(),
        }
    }

    /// Create a detached text node
    pub fn text(node_id: NodeId, value: impl Into<String>) -> Self {
        Self::leaf(node_id, NodeType::Text, "#text", value.into())
    }

    /// Create a detached CDATA section
    pub fn cdata(node_id: NodeId, value: impl Into<String>) -> Self {
        Self::leaf(node_id, NodeType::CData, "#cdata-section", value.into())
    }

    /// Create a detached comment
    pub fn comment(node_id: NodeId, value: impl Into<String>) -> Self {
        Self::leaf(node_id, NodeType::Comment, "#comment", value.into())
    }

    /// Create a detached processing instruction. The target is kept as the
    /// node name, the rest as its value.
    pub fn processing_instruction(node_id: NodeId, target: impl Into<String>, data: impl Into<String>) -> Self {
        Self::leaf(node_id, NodeType::ProcessingInstruction, target, data.into())
    }

    fn leaf(node_id: NodeId, node_type: NodeType, node_name: impl Into<String>, node_value: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value,
            attributes: Attributes::new(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Text or CDATA: content that makes its parent mixed
    pub fn is_character_data(&self) -> bool {
        matches!(self.node_type, NodeType::Text | NodeType::CData)
    }

    /// Check if node is an element with the given tag name
    pub fn is_named(&self, name: &str) -> bool {
        self.is_element() && self.node_name == name
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        let elem = DomNode::element(0, "para");
        assert!(elem.is_element());
        assert_eq!(elem.tag_name(), Some("para"));
        assert!(elem.is_named("para"));

        let text = DomNode::text(1, "hello");
        assert!(text.is_text());
        assert_eq!(text.tag_name(), None);
        assert!(!text.is_named("#text"));

        let cdata = DomNode::cdata(2, "a < b");
        assert!(cdata.is_character_data());
        assert!(!cdata.is_text());

        let pi = DomNode::processing_instruction(3, "asciidoc-br", "");
        assert_eq!(pi.node_name, "asciidoc-br");
        assert_eq!(pi.tag_name(), None);
        assert!(!pi.is_named("asciidoc-br"));
        assert!(!DomNode::comment(4, " note ").is_character_data());
    }

    #[test]
    fn test_node_type_roundtrip_through_json() {
        let mut node = DomNode::element(4, "table");
        node.attributes.insert("frame".to_string(), "all".to_string());
        node.attributes.insert("rowsep".to_string(), "1".to_string());

        let json = serde_json::to_string(&node).unwrap();
        let back: DomNode = serde_json::from_str(&json).unwrap();

        let names: Vec<_> = back.attributes.keys().cloned().collect();
        assert_eq!(names, vec!["frame", "rowsep"]);
        assert_eq!(back.node_type, NodeType::Element);
    }
}
