//! Quotations: attribution flattening and blockquote wrapping

use dom::utils::get_text_content;
use dom::DomArena;

use crate::rule::Rule;

/// Replaces an attribution's structured children with one comma-separated
/// line of their trimmed text, skipping children that are blank.
pub struct FlattenAttributions;

impl Rule for FlattenAttributions {
    fn name(&self) -> &str {
        "flatten-attributions"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for attribution in arena.select("attribution") {
            let children = arena.child_ids(attribution)?;
            let mut parts = Vec::with_capacity(children.len());
            for child in &children {
                let text = get_text_content(arena, *child)?;
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }

            for child in children {
                arena.remove(child)?;
            }
            if !parts.is_empty() {
                let text = arena.create_text(&parts.join(", "));
                arena.append_child(attribution, text)?;
            }
            touched += 1;
        }

        Ok(touched)
    }
}

/// Puts each `blockquote` that is not already inside a `para` into a new one
pub struct WrapBlockquotes;

impl Rule for WrapBlockquotes {
    fn name(&self) -> &str {
        "wrap-blockquotes"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for quote in arena.select("blockquote") {
            let Some(parent) = arena.parent_id(quote)? else {
                continue;
            };
            if arena.name(parent) == Some("para") {
                continue;
            }

            let para = arena.create_element("para");
            arena.insert_before(quote, para)?;
            arena.append_child(para, quote)?;
            touched += 1;
        }

        Ok(touched)
    }
}
