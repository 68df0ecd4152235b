//! Cross-reference labels
//!
//! The book toolchain renders an `xref` as a bare number, so the type word
//! ("Listing", "Chapter", ...) is written into the text right before it.

use std::borrow::Cow;

use ahash::AHashMap;
use dom::utils::capitalize;
use dom::{DomArena, NodeId};

use crate::rule::Rule;

/// Label for a reference target, by the target's tag name.
///
/// Unresolved references read as sections.
pub fn label_for(target: Option<&str>) -> Cow<'static, str> {
    match target {
        None => Cow::Borrowed("Section"),
        Some("example" | "informalexample") => Cow::Borrowed("Listing"),
        Some("chapter") => Cow::Borrowed("Chapter"),
        Some("section") => Cow::Borrowed("Section"),
        Some("appendix") => Cow::Borrowed("Appendix"),
        Some("figure") => Cow::Borrowed("Figure"),
        Some("table") => Cow::Borrowed("Table"),
        Some("part") => Cow::Borrowed("Part"),
        Some("preface") => Cow::Borrowed("Preface"),
        Some("sidebar") => Cow::Borrowed("Sidebar"),
        Some(other) => Cow::Owned(capitalize(other)),
    }
}

/// Inserts "<Label> " before every `xref` that has a `linkend`
pub struct LabelCrossReferences;

impl LabelCrossReferences {
    /// id → element over the live tree
    fn index_ids(arena: &DomArena) -> AHashMap<String, NodeId> {
        let mut ids = AHashMap::new();
        for id in arena.find(|node| node.attr("id").is_some()) {
            if let Some(value) = arena.attr(id, "id") {
                // First occurrence wins, as with a document-order lookup
                ids.entry(value.to_string()).or_insert(id);
            }
        }
        ids
    }
}

impl Rule for LabelCrossReferences {
    fn name(&self) -> &str {
        "label-cross-references"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let ids = Self::index_ids(arena);
        let mut touched = 0;

        for xref in arena.select("xref") {
            let Some(linkend) = arena.attr(xref, "linkend") else {
                continue;
            };
            let target = ids.get(linkend).and_then(|id| arena.name(*id));
            let label = format!("{} ", label_for(target));

            let text = arena.create_text(&label);
            arena.insert_before(xref, text)?;
            touched += 1;
        }

        Ok(touched)
    }
}
