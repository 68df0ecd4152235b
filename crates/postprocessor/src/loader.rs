//! Loader - raw compiler output → working document
//!
//! Responsibilities:
//! - Pass already-final documents through untouched
//! - Wrap a bare paragraph fragment in a chapter-like shell
//! - Strip doctype lines (the target schema supplies its own)
//! - Parse namespace-agnostically with blank text dropped
//! - Normalize chapter-like root synonyms to `chapter`

use std::sync::LazyLock;

use dom::{DomParser, Document};
use regex::Regex;

use crate::config::PostprocessorConfig;
use crate::error::Result;

/// A doctype declaration, internal subset included
static DOCTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!DOCTYPE[^>\[]*(?:\[[^\]]*\])?\s*>").expect("doctype pattern is valid")
});

/// Start tags that mark a bare paragraph fragment rather than a document
const FRAGMENT_STARTS: &[&str] = &["<simpara>", "<simpara ", "<para>", "<para "];

/// Root names that are chapters in all but name
const CHAPTER_SYNONYMS: &[&str] = &["preface", "appendix"];

/// Result of loading raw input
#[derive(Debug)]
pub enum Loaded {
    /// A parsed tree ready for the rule engine
    Document(Document),
    /// Input to hand back unchanged
    PassThrough(String),
}

pub struct Loader<'a> {
    config: &'a PostprocessorConfig,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a PostprocessorConfig) -> Self {
        Self { config }
    }

    /// Load raw input. Malformed XML is an error; an input without any
    /// element comes back as `PassThrough` with its doctype removed.
    pub fn load(&self, raw: &str) -> Result<Loaded> {
        if raw.starts_with(&self.config.pass_through_marker) {
            tracing::debug!("[Loader] Input already final, passing through");
            return Ok(Loaded::PassThrough(raw.to_string()));
        }

        let wrapped = if is_bare_fragment(raw) {
            tracing::debug!(
                "[Loader] Wrapping bare fragment in <{}>",
                self.config.fragment_root
            );
            let root = &self.config.fragment_root;
            format!("<{root}><title/>{raw}</{root}>")
        } else {
            raw.to_string()
        };
        let stripped = DOCTYPE.replace_all(&wrapped, "").into_owned();

        let mut parser = DomParser::new();
        let Some(root_id) = parser.parse_str(&stripped)? else {
            tracing::debug!("[Loader] No root element, returning input unchanged");
            return Ok(Loaded::PassThrough(stripped));
        };

        let mut doc = parser.into_document();
        let root_name = doc.root_name().unwrap_or_default().to_string();
        if CHAPTER_SYNONYMS.contains(&root_name.as_str()) {
            tracing::debug!("[Loader] Normalizing root <{}> to <chapter>", root_name);
            doc.arena_mut().rename(root_id, "chapter")?;
        }
        doc.namespace = Some(self.config.namespace.clone());

        Ok(Loaded::Document(doc))
    }
}

fn is_bare_fragment(raw: &str) -> bool {
    let head = raw.trim_start();
    FRAGMENT_STARTS.iter().any(|start| head.starts_with(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(raw: &str) -> Loaded {
        let config = PostprocessorConfig::default();
        Loader::new(&config).load(raw).unwrap()
    }

    fn document(raw: &str) -> Document {
        match load(raw) {
            Loaded::Document(doc) => doc,
            Loaded::PassThrough(s) => panic!("Expected document, got pass-through: {s}"),
        }
    }

    #[test]
    fn test_html_doctype_passes_through() {
        let raw = "<!DOCTYPE html>\n<html><body><p>done</p></body></html>";
        match load(raw) {
            Loaded::PassThrough(s) => assert_eq!(s, raw),
            Loaded::Document(_) => panic!("Expected pass-through"),
        }
    }

    #[test]
    fn test_fragment_is_wrapped_and_normalized() {
        let doc = document("<simpara>Just text</simpara>");
        assert_eq!(doc.root_name(), Some("chapter"));

        let root = doc.root_id().unwrap();
        let names: Vec<_> = doc
            .arena()
            .children(root)
            .unwrap()
            .iter()
            .map(|n| n.node_name.clone())
            .collect();
        assert_eq!(names, vec!["title", "simpara"]);
    }

    #[test]
    fn test_doctype_is_stripped() {
        let doc = document(
            "<?xml version=\"1.0\"?>\n<!DOCTYPE book PUBLIC \"-//OASIS//DTD DocBook XML V4.5//EN\" \"docbookx.dtd\">\n<book><title>B</title></book>",
        );
        assert_eq!(doc.root_name(), Some("book"));
    }

    #[test]
    fn test_doctype_on_same_line_as_root() {
        let doc = document("<!DOCTYPE chapter [<!ENTITY x \"y\">]><chapter><title>C</title></chapter>");
        assert_eq!(doc.root_name(), Some("chapter"));
    }

    #[test]
    fn test_namespace_is_replaced() {
        let doc = document(r#"<book xmlns="http://docbook.org/ns/docbook" version="5.0"/>"#);
        let root = doc.arena().root().unwrap();
        assert_eq!(root.attr("xmlns"), None);
        assert_eq!(root.attr("version"), Some("5.0"));
        assert_eq!(doc.namespace.as_deref(), Some(crate::config::BOOK_XMLNS));
    }

    #[test]
    fn test_appendix_root_becomes_chapter() {
        let doc = document("<appendix><title>A</title></appendix>");
        assert_eq!(doc.root_name(), Some("chapter"));
    }

    #[test]
    fn test_no_root_returns_stripped_input() {
        match load("<!DOCTYPE book>\n<!-- empty -->") {
            Loaded::PassThrough(s) => assert_eq!(s, "\n<!-- empty -->"),
            Loaded::Document(_) => panic!("Expected pass-through"),
        }
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let config = PostprocessorConfig::default();
        assert!(Loader::new(&config).load("<book><para></book>").is_err());
    }
}
