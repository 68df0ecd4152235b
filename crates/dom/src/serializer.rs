//! Document serializer - render the tree back to XML text
//!
//! Formatting follows libxml's "format" output:
//! - an element whose children are all elements gets one child per line,
//!   indented by `indent` spaces per level
//! - an element holding any text or CDATA is written inline, and so is
//!   everything below it, so character data is never altered
//! - comments and processing instructions count as markup, not text
//! - childless elements self-close

use quick_xml::escape::{escape, partial_escape};
use serde::{Deserialize, Serialize};

use crate::arena::DomArena;
use crate::document::Document;
use crate::error::Result;
use crate::types::*;

/// Serializer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration line
    pub xml_declaration: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: true,
        }
    }
}

/// Tree serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a document as UTF-8 XML
    pub fn serialize(&self, doc: &Document) -> Result<String> {
        let arena = doc.arena();
        let mut output = String::with_capacity(4096);

        if self.config.xml_declaration {
            output.push_str(r#"<?xml version="1.0" encoding="UTF-8""#);
            if let Some(standalone) = &doc.standalone {
                output.push_str(&format!(r#" standalone="{}""#, escape(standalone.as_str())));
            }
            output.push_str("?>\n");
        }

        if let Some(root_id) = arena.root_id() {
            let namespace = doc.namespace.as_deref();
            self.serialize_node(arena, root_id, 0, true, namespace, &mut output)?;
            output.push('\n');
        }

        Ok(output)
    }

    /// Serialize a single node recursively
    fn serialize_node(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        depth: usize,
        format: bool,
        namespace: Option<&str>,
        output: &mut String,
    ) -> Result<()> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                // Format: <tag xmlns="..." attr="value">
                output.push('<');
                output.push_str(&node.node_name);

                if let Some(ns) = namespace {
                    output.push_str(&format!(" xmlns=\"{}\"", escape(ns)));
                }
                for (name, value) in &node.attributes {
                    output.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
                }

                if node.children_ids.is_empty() {
                    output.push_str("/>");
                    return Ok(());
                }
                output.push('>');

                // Any text child switches formatting off for the whole subtree
                let mut has_text = false;
                for &child_id in &node.children_ids {
                    has_text |= arena.get(child_id)?.is_character_data();
                }
                let format = format && !has_text;

                for &child_id in &node.children_ids {
                    if format {
                        output.push('\n');
                        output.push_str(&" ".repeat(self.config.indent * (depth + 1)));
                    }
                    self.serialize_node(arena, child_id, depth + 1, format, None, output)?;
                }

                if format {
                    output.push('\n');
                    output.push_str(&" ".repeat(self.config.indent * depth));
                }

                // Closing tag
                output.push_str("</");
                output.push_str(&node.node_name);
                output.push('>');
            }
            NodeType::Text => {
                output.push_str(&partial_escape(node.node_value.as_str()));
            }
            NodeType::CData => {
                output.push_str("<![CDATA[");
                output.push_str(&node.node_value);
                output.push_str("]]>");
            }
            NodeType::Comment => {
                output.push_str("<!--");
                output.push_str(&node.node_value);
                output.push_str("-->");
            }
            NodeType::ProcessingInstruction => {
                output.push_str("<?");
                output.push_str(&node.node_name);
                if !node.node_value.is_empty() {
                    output.push(' ');
                    output.push_str(&node.node_value);
                }
                output.push_str("?>");
            }
        }

        Ok(())
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize with the default configuration
pub fn to_xml(doc: &Document) -> Result<String> {
    DomSerializer::new().serialize(doc)
}
