//! Part structure: intro grouping and appendix hoisting
//!
//! A part may only hold a title, one partintro and its chapters, so loose
//! intro content is grouped and appendices are moved out beside the part.

use ahash::AHashMap;
use dom::{DomArena, NodeId};

use crate::rule::Rule;

/// Direct part children that belong in the intro
const INTRO_CONTENT: &[&str] = &["para", "itemizedlist"];

/// Ensures every part owns one `partintro` holding its loose paragraphs and
/// itemized lists, in their original order.
pub struct PartIntro;

impl Rule for PartIntro {
    fn name(&self) -> &str {
        "part-intro"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for part in arena.select("part") {
            let children = arena.child_ids(part)?;
            let existing = children
                .iter()
                .copied()
                .find(|id| arena.name(*id) == Some("partintro"));

            let intro = match existing {
                Some(id) => id,
                None => {
                    let id = arena.create_element("partintro");
                    // Second child, right after the title
                    arena.insert_child(part, 1, id)?;
                    touched += 1;
                    id
                }
            };

            for child in children {
                let is_intro = arena
                    .name(child)
                    .map(|name| INTRO_CONTENT.contains(&name))
                    .unwrap_or(false);
                if is_intro {
                    arena.append_child(intro, child)?;
                    touched += 1;
                }
            }
        }

        Ok(touched)
    }
}

/// Moves appendices nested in a part to follow the part instead
pub struct HoistAppendices;

impl Rule for HoistAppendices {
    fn name(&self) -> &str {
        "hoist-appendices"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        // Last node placed after each part, so hoisted appendices keep order
        let mut anchors: AHashMap<NodeId, NodeId> = AHashMap::new();
        let mut touched = 0;

        for appendix in arena.select("part/appendix") {
            let Some(part) = arena.parent_id(appendix)? else {
                continue;
            };
            if arena.parent_id(part)?.is_none() {
                // A root part has nowhere to hoist to
                continue;
            }

            let anchor = anchors.get(&part).copied().unwrap_or(part);
            arena.insert_after(anchor, appendix)?;
            anchors.insert(part, appendix);
            touched += 1;
        }

        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::apply;

    #[test]
    fn test_intro_created_after_title() {
        let (out, touched) = apply(
            &PartIntro,
            "<book><part><title>P</title><para>Intro text</para><chapter><title>C</title></chapter></part></book>",
        );

        assert_eq!(touched, 2);
        assert_eq!(
            out,
            "<book><part><title>P</title><partintro><para>Intro text</para></partintro><chapter><title>C</title></chapter></part></book>"
        );
    }

    #[test]
    fn test_existing_intro_collects_stray_content() {
        let (out, _) = apply(
            &PartIntro,
            "<book><part><title>P</title><partintro><para>a</para></partintro><itemizedlist><listitem/></itemizedlist><chapter/><para>b</para></part></book>",
        );

        assert_eq!(
            out,
            "<book><part><title>P</title><partintro><para>a</para><itemizedlist><listitem/></itemizedlist><para>b</para></partintro><chapter/></part></book>"
        );
    }

    #[test]
    fn test_intro_is_added_even_without_content() {
        let (out, touched) = apply(&PartIntro, "<book><part><title>P</title><chapter/></part></book>");
        assert_eq!(touched, 1);
        assert_eq!(out, "<book><part><title>P</title><partintro/><chapter/></part></book>");
    }

    #[test]
    fn test_nested_paras_are_untouched() {
        let (out, _) = apply(
            &PartIntro,
            "<book><part><title>P</title><chapter><para>x</para></chapter></part></book>",
        );
        assert!(out.contains("<chapter><para>x</para></chapter>"));
    }

    #[test]
    fn test_appendices_follow_their_part_in_order() {
        let (out, touched) = apply(
            &HoistAppendices,
            "<book><part><title>P</title><chapter/><appendix id=\"a1\"/><appendix id=\"a2\"/></part><part><title>Q</title></part></book>",
        );

        assert_eq!(touched, 2);
        assert_eq!(
            out,
            "<book><part><title>P</title><chapter/></part><appendix id=\"a1\"/><appendix id=\"a2\"/><part><title>Q</title></part></book>"
        );
    }

    #[test]
    fn test_root_part_keeps_its_appendix() {
        let (out, touched) = apply(&HoistAppendices, "<part><appendix/></part>");
        assert_eq!(touched, 0);
        assert_eq!(out, "<part><appendix/></part>");
    }
}
