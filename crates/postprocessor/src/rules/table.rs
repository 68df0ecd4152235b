//! Table header cells

use dom::DomArena;

use crate::rule::Rule;

/// Wraps the content of every header cell in a `para`
pub struct WrapHeaderCells;

impl Rule for WrapHeaderCells {
    fn name(&self) -> &str {
        "wrap-header-cells"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;

        for entry in arena.select("thead/row/entry") {
            let children = arena.child_ids(entry)?;
            if let [only] = children.as_slice() {
                if arena.name(*only) == Some("para") {
                    continue;
                }
            }

            let para = arena.create_element("para");
            for child in children {
                arena.append_child(para, child)?;
            }
            arena.append_child(entry, para)?;
            touched += 1;
        }

        Ok(touched)
    }
}
