//! Metadata pruning: noisy elements and presentation attributes

use dom::DomArena;

use crate::rule::Rule;

/// Elements the book schema has no use for
pub const REMOVED_ELEMENTS: &[&str] = &[
    "bookinfo/date",
    "bookinfo/authorinitials",
    "mediaobject/caption",
];

/// (selector, attributes) pairs to strip
pub const REMOVED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("orderedlist", &["numeration"]),
    ("programlisting|screen", &["linenumbering"]),
    ("table|informaltable", &["frame", "rowsep", "colsep"]),
    ("entry", &["align", "valign"]),
];

/// Removes elements, then attributes. Re-running is a no-op.
pub struct PruneMetadata {
    elements: &'static [&'static str],
    attributes: &'static [(&'static str, &'static [&'static str])],
}

impl PruneMetadata {
    pub fn new(
        elements: &'static [&'static str],
        attributes: &'static [(&'static str, &'static [&'static str])],
    ) -> Self {
        Self {
            elements,
            attributes,
        }
    }

    pub fn standard() -> Self {
        Self::new(REMOVED_ELEMENTS, REMOVED_ATTRIBUTES)
    }
}

impl Rule for PruneMetadata {
    fn name(&self) -> &str {
        "prune-metadata"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = remove_all(arena, self.elements)?;

        for (selector, names) in self.attributes {
            for id in arena.select(selector) {
                for name in *names {
                    if arena.remove_attr(id, name)?.is_some() {
                        touched += 1;
                    }
                }
            }
        }
        Ok(touched)
    }
}

/// Deletes every element matching any of the selectors
pub struct RemoveElements {
    name: &'static str,
    selectors: &'static [&'static str],
}

impl RemoveElements {
    pub fn new(name: &'static str, selectors: &'static [&'static str]) -> Self {
        Self { name, selectors }
    }

    /// Column specs are presentation hints the book schema drops
    pub fn column_specs() -> Self {
        Self::new("remove-column-specs", &["colspec"])
    }
}

impl Rule for RemoveElements {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        remove_all(arena, self.selectors)
    }
}

fn remove_all(arena: &mut DomArena, selectors: &[&str]) -> dom::Result<usize> {
    let mut touched = 0;
    for selector in selectors {
        for id in arena.select(selector) {
            arena.remove(id)?;
            touched += 1;
        }
    }
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{apply, render};

    const BOOK: &str = r#"<book><bookinfo><title>B</title><date>2020</date><authorinitials>AB</authorinitials></bookinfo><chapter><date>keep</date><orderedlist numeration="arabic" spacing="compact"><listitem/></orderedlist><programlisting linenumbering="unnumbered" format="java">x</programlisting><table frame="all" rowsep="1" colsep="1" id="t"><tgroup cols="1"><colspec colname="c1"/><tbody><row><entry align="left" valign="top">v</entry></row></tbody></tgroup></table><mediaobject><imageobject/><caption>c</caption></mediaobject></chapter></book>"#;

    #[test]
    fn test_prunes_elements_and_attributes() {
        let (out, touched) = apply(&PruneMetadata::standard(), BOOK);

        assert_eq!(touched, 3 + 1 + 1 + 3 + 2);
        assert!(out.contains("<bookinfo><title>B</title></bookinfo>"));
        assert!(out.contains("<date>keep</date>"));
        assert!(out.contains(r#"<orderedlist spacing="compact">"#));
        assert!(out.contains(r#"<programlisting format="java">"#));
        assert!(out.contains(r#"<table id="t">"#));
        assert!(out.contains("<entry>v</entry>"));
        assert!(out.contains("<mediaobject><imageobject/></mediaobject>"));
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let rule = PruneMetadata::standard();
        let mut doc = dom::parse(BOOK).unwrap();
        rule.apply(doc.arena_mut()).unwrap();
        let once = render(&doc);

        let touched = rule.apply(doc.arena_mut()).unwrap();
        assert_eq!(touched, 0);
        assert_eq!(render(&doc), once);
    }

    #[test]
    fn test_column_specs_removed() {
        let (out, touched) = apply(&RemoveElements::column_specs(), BOOK);
        assert_eq!(touched, 1);
        assert!(!out.contains("colspec"));
        assert!(out.contains(r#"<tgroup cols="1"><tbody>"#));
    }
}
