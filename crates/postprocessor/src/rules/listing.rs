//! Code listings: formal/informal wrappers, annotation hints, callouts
//!
//! Every code or screen block ends up as a `programlisting` inside either an
//! `example` (it had a title) or an `informalexample` (it did not).

use dom::utils::has_token;
use dom::{DomArena, NodeId};

use super::CODE_BLOCKS;
use crate::rule::Rule;

/// Role token asking for annotations below the listing
pub const LONG_ANNOTATIONS: &str = "long-annotations";

/// Wrapper names that already count as a listing container
const LISTING_WRAPPERS: &[&str] = &["example", "informalexample"];

/// Copies the long-annotations hint from `source` onto `wrapper`, then drops
/// the source's `role` whether or not it carried the token.
pub fn propagate_annotations(arena: &mut DomArena, source: NodeId, wrapper: NodeId) -> dom::Result<()> {
    if let Some(role) = arena.remove_attr(source, "role")? {
        if has_token(&role, LONG_ANNOTATIONS) {
            arena.set_attr(wrapper, "annotations", "below")?;
        }
    }
    Ok(())
}

/// `formalpara/para/<block>` → `example/programlisting`
pub struct FormalListings;

impl Rule for FormalListings {
    fn name(&self) -> &str {
        "formal-listings"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let selector = format!("formalpara/para/{CODE_BLOCKS}");
        let mut touched = 0;

        // Selected up front: renaming the first block's formalpara must not
        // hide its siblings from this pass.
        for block in arena.select(&selector) {
            let Some(para) = arena.parent_id(block)? else {
                continue;
            };
            let Some(formal) = arena.parent_id(para)? else {
                continue;
            };

            arena.rename(block, "programlisting")?;
            arena.insert_before(para, block)?;
            arena.rename(formal, "example")?;
            propagate_annotations(arena, para, formal)?;

            if arena.get(para)?.children_ids.is_empty() {
                arena.remove(para)?;
            }
            touched += 1;
        }

        Ok(touched)
    }
}

/// Wraps every block not already in a listing container in an
/// `informalexample`
pub struct InformalListings;

impl Rule for InformalListings {
    fn name(&self) -> &str {
        "informal-listings"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for block in arena.select(CODE_BLOCKS) {
            let Some(parent) = arena.parent_id(block)? else {
                continue;
            };
            let wrapped = arena
                .name(parent)
                .map(|name| LISTING_WRAPPERS.contains(&name))
                .unwrap_or(false);
            if wrapped {
                continue;
            }

            let wrapper = arena.create_element("informalexample");
            arena.insert_before(block, wrapper)?;
            arena.rename(block, "programlisting")?;
            arena.append_child(wrapper, block)?;
            propagate_annotations(arena, block, wrapper)?;
            touched += 1;
        }

        Ok(touched)
    }
}

/// Moves a `calloutlist` into the listing right before it
pub struct AttachCalloutLists;

impl Rule for AttachCalloutLists {
    fn name(&self) -> &str {
        "attach-callout-lists"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for list in arena.select("calloutlist") {
            let Some(previous) = arena.previous_sibling(list)? else {
                continue;
            };
            let is_example = arena
                .name(previous)
                .map(|name| name.ends_with("example"))
                .unwrap_or(false);
            if is_example {
                arena.append_child(previous, list)?;
                touched += 1;
            }
        }

        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::apply;

    #[test]
    fn test_formal_listing_becomes_example() {
        let (out, touched) = apply(
            &FormalListings,
            r#"<chapter><formalpara id="l1"><title>Hello</title><para role="long-annotations"><screen>puts 1</screen></para></formalpara></chapter>"#,
        );

        assert_eq!(touched, 1);
        assert_eq!(
            out,
            r#"<chapter><example id="l1" annotations="below"><title>Hello</title><programlisting>puts 1</programlisting></example></chapter>"#
        );
    }

    #[test]
    fn test_formal_listing_keeps_block_order() {
        let (out, touched) = apply(
            &FormalListings,
            "<chapter><formalpara><title>T</title><para><programlisting>a</programlisting><screen>b</screen></para></formalpara></chapter>",
        );

        assert_eq!(touched, 2);
        assert_eq!(
            out,
            "<chapter><example><title>T</title><programlisting>a</programlisting><programlisting>b</programlisting></example></chapter>"
        );
    }

    #[test]
    fn test_role_without_token_is_dropped() {
        let (out, _) = apply(
            &FormalListings,
            r#"<chapter><formalpara><title>T</title><para role="wide"><screen>x</screen></para></formalpara></chapter>"#,
        );
        assert!(!out.contains("role"));
        assert!(!out.contains("annotations"));
    }

    #[test]
    fn test_informal_listing_is_wrapped() {
        let (out, touched) = apply(
            &InformalListings,
            r#"<chapter><para>before</para><screen role="x long-annotations">$ ls</screen><example><title>T</title><programlisting>kept</programlisting></example></chapter>"#,
        );

        assert_eq!(touched, 1);
        assert_eq!(
            out,
            r#"<chapter><para>before</para><informalexample annotations="below"><programlisting>$ ls</programlisting></informalexample><example><title>T</title><programlisting>kept</programlisting></example></chapter>"#
        );
    }

    #[test]
    fn test_callout_list_joins_preceding_example() {
        let (out, touched) = apply(
            &AttachCalloutLists,
            "<chapter><informalexample><programlisting>x</programlisting></informalexample><calloutlist><callout/></calloutlist><para>p</para><calloutlist/></chapter>",
        );

        assert_eq!(touched, 1);
        assert_eq!(
            out,
            "<chapter><informalexample><programlisting>x</programlisting><calloutlist><callout/></calloutlist></informalexample><para>p</para><calloutlist/></chapter>"
        );
    }

    #[test]
    fn test_callout_list_without_sibling_stays() {
        let (out, touched) = apply(&AttachCalloutLists, "<chapter><calloutlist/></chapter>");
        assert_eq!(touched, 0);
        assert_eq!(out, "<chapter><calloutlist/></chapter>");
    }
}
