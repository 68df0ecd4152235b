//! XML → arena construction
//!
//! This handles:
//! - Tokenizing with quick-xml
//! - Namespace stripping (prefixes dropped, `xmlns` declarations removed)
//! - "noblanks" whitespace handling, following libxml's heuristic and
//!   honouring `xml:space="preserve"`
//! - Entity and character reference resolution
//! - Comments, processing instructions and CDATA sections kept as nodes
//! - Capturing the XML declaration's `standalone` value

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::arena::DomArena;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};

/// Configuration for the parser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Drop namespace prefixes from element and attribute names and remove
    /// every `xmlns`/`xmlns:*` declaration
    pub strip_namespaces: bool,
    /// Keep whitespace-only text runs everywhere
    pub keep_blanks: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strip_namespaces: true,
            keep_blanks: false,
        }
    }
}

/// An element still waiting for its end tag
struct OpenElement {
    id: NodeId,
    /// `xml:space="preserve"` is in effect, set here or inherited
    preserve_space: bool,
}

/// Builds a `DomArena` from XML text
pub struct DomParser {
    config: ParserConfig,
    arena: DomArena,
    standalone: Option<String>,
}

impl DomParser {
    /// Create new parser with default config
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create parser with custom config
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            arena: DomArena::new(),
            standalone: None,
        }
    }

    /// Hand the parsed tree over as a document
    pub fn into_document(self) -> Document {
        let mut doc = Document::new(self.arena);
        doc.standalone = self.standalone;
        doc
    }

    /// Parse a complete XML string.
    ///
    /// Returns the root element id, or `None` if the input holds no element
    /// at all. Doctypes, and anything outside the root element, are skipped.
    pub fn parse_str(&mut self, xml: &str) -> Result<Option<NodeId>> {
        self.arena.clear();
        self.standalone = None;

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<OpenElement> = Vec::new();
        let mut pending = String::new();

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(source) => {
                    return Err(DomError::Xml {
                        position: reader.error_position(),
                        source,
                    })
                }
            };

            match event {
                Event::Start(e) => {
                    self.flush_text(&mut pending, stack.last(), false)?;
                    let parent = stack.last();
                    let preserve_space = preserves_space(&e, parent.is_some_and(|p| p.preserve_space))?;
                    let id = self.open_element(&e, parent.map(|p| p.id))?;
                    stack.push(OpenElement { id, preserve_space });
                }
                Event::Empty(e) => {
                    self.flush_text(&mut pending, stack.last(), false)?;
                    self.open_element(&e, stack.last().map(|p| p.id))?;
                }
                Event::End(e) => {
                    self.flush_text(&mut pending, stack.last(), true)?;
                    let closing = self.element_name(e.name())?;
                    let Some(open) = stack.pop() else {
                        return Err(DomError::UnbalancedTag {
                            expected: String::new(),
                            actual: closing,
                        });
                    };
                    let expected = &self.arena.get(open.id)?.node_name;
                    if *expected != closing {
                        return Err(DomError::UnbalancedTag {
                            expected: expected.clone(),
                            actual: closing,
                        });
                    }
                }
                Event::Text(e) => pending.push_str(std::str::from_utf8(&e)?),
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(e.as_ref())?;
                    pending.push_str(&resolve_reference(name)?);
                }
                Event::CData(e) => {
                    self.flush_text(&mut pending, stack.last(), false)?;
                    let node = DomNode::cdata(0, std::str::from_utf8(&e)?);
                    self.append_leaf(node, stack.last())?;
                }
                Event::Comment(e) => {
                    self.flush_text(&mut pending, stack.last(), false)?;
                    let node = DomNode::comment(0, std::str::from_utf8(&e)?);
                    self.append_leaf(node, stack.last())?;
                }
                Event::PI(e) => {
                    self.flush_text(&mut pending, stack.last(), false)?;
                    let target = std::str::from_utf8(e.target())?;
                    let data = std::str::from_utf8(e.content())?.trim_start();
                    let node = DomNode::processing_instruction(0, target, data);
                    self.append_leaf(node, stack.last())?;
                }
                Event::Decl(decl) => {
                    if let Some(Ok(value)) = decl.standalone() {
                        self.standalone = Some(std::str::from_utf8(&value)?.to_string());
                    }
                }
                Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(DomError::UnbalancedTag {
                expected: self.arena.get(open.id)?.node_name.clone(),
                actual: "EOF".to_string(),
            });
        }

        Ok(self.arena.root_id())
    }

    /// Create an element for a start/empty tag and attach it
    fn open_element(&mut self, start: &BytesStart<'_>, parent: Option<NodeId>) -> Result<NodeId> {
        let name = self.element_name(start.name())?;
        let mut node = DomNode::element(0, name);

        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            let is_declaration = key == b"xmlns" || key.starts_with(b"xmlns:");
            if is_declaration && self.config.strip_namespaces {
                continue;
            }

            let key = if self.config.strip_namespaces {
                attr.key.local_name().as_ref().to_vec()
            } else {
                key.to_vec()
            };
            let key = String::from_utf8(key).map_err(|e| e.utf8_error())?;
            let value = unescape(std::str::from_utf8(&attr.value)?)?;
            node.attributes.insert(key, value.into_owned());
        }

        let id = self.arena.add_node(node);
        match parent {
            Some(parent_id) => self.arena.append_child(parent_id, id)?,
            None => {
                if self.arena.root_id().is_some() {
                    let name = self.arena.get(id)?.node_name.clone();
                    return Err(DomError::MultipleRoots(name));
                }
                self.arena.set_root(id)?;
            }
        }
        Ok(id)
    }

    fn element_name(&self, name: quick_xml::name::QName<'_>) -> Result<String> {
        let bytes = if self.config.strip_namespaces {
            name.local_name().into_inner()
        } else {
            name.into_inner()
        };
        Ok(std::str::from_utf8(bytes)?.to_string())
    }

    /// Attach a comment, PI or CDATA node to the open element. Outside the
    /// root there is nothing to attach to.
    fn append_leaf(&mut self, node: DomNode, open: Option<&OpenElement>) -> Result<()> {
        let Some(open) = open else {
            return Ok(());
        };
        let id = self.arena.add_node(node);
        self.arena.append_child(open.id, id)
    }

    /// Turn buffered character data into a text node under the open element.
    ///
    /// A whitespace-only run is kept only under `xml:space="preserve"`, if it
    /// is the whole content of its element, or if the element already starts
    /// or ends with text.
    fn flush_text(&mut self, pending: &mut String, open: Option<&OpenElement>, closing: bool) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(pending);
        let Some(open) = open else {
            return Ok(());
        };

        let droppable = !self.config.keep_blanks && !open.preserve_space && text.trim().is_empty();
        if droppable && !self.keeps_blank(open.id, closing)? {
            return Ok(());
        }

        let id = self.arena.create_text(&text);
        self.arena.append_child(open.id, id)
    }

    fn keeps_blank(&self, parent_id: NodeId, closing: bool) -> Result<bool> {
        let children = &self.arena.get(parent_id)?.children_ids;
        let is_text = |id: Option<&NodeId>| -> Result<bool> {
            match id {
                Some(id) => Ok(self.arena.get(*id)?.is_text()),
                None => Ok(false),
            }
        };

        Ok((closing && children.is_empty()) || is_text(children.first())? || is_text(children.last())?)
    }
}

/// The `xml:space` setting on `start`, or `inherited` when it has none
fn preserves_space(start: &BytesStart<'_>, inherited: bool) -> Result<bool> {
    let Some(attr) = start.try_get_attribute("xml:space")? else {
        return Ok(inherited);
    };
    Ok(match attr.value.as_ref() {
        b"preserve" => true,
        b"default" => false,
        _ => inherited,
    })
}

impl Default for DomParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `&name;` (predefined entities) and `&#N;` / `&#xN;`
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        };
        return parsed
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| DomError::UnknownEntity(name.to_string()));
    }

    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| DomError::UnknownEntity(name.to_string()))
}

/// Parse `xml` with the default configuration
pub fn parse(xml: &str) -> Result<Document> {
    let mut parser = DomParser::new();
    parser.parse_str(xml)?;
    Ok(parser.into_document())
}
