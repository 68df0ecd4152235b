//! Error types for tree operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

use crate::types::NodeId;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Node {0} has no parent")]
    Detached(NodeId),

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8 in document: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("Mismatched closing tag: expected </{expected}>, got </{actual}>")]
    UnbalancedTag { expected: String, actual: String },

    #[error("Document has more than one root element: <{0}>")]
    MultipleRoots(String),

    #[error("Invalid selector: {0:?}")]
    InvalidSelector(String),
}
