//! Vocabulary renames: element names and attribute names

use dom::DomArena;

use super::CODE_BLOCKS;
use crate::rule::Rule;

/// Generic element name → book schema element name
pub const ELEMENTS_MAP: &[(&str, &str)] = &[
    ("simpara", "para"),
    ("literal", "code"),
    ("phrase", "para"),
    ("textobject", "caption"),
];

/// Renames every element in the map, at any depth
pub struct RenameElements {
    map: &'static [(&'static str, &'static str)],
}

impl RenameElements {
    pub fn new(map: &'static [(&'static str, &'static str)]) -> Self {
        Self { map }
    }

    pub fn standard() -> Self {
        Self::new(ELEMENTS_MAP)
    }
}

impl Rule for RenameElements {
    fn name(&self) -> &str {
        "rename-elements"
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;
        for (from, to) in self.map {
            for id in arena.select(from) {
                arena.rename(id, to)?;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

/// Renames one attribute on every element matching a selector
pub struct RenameAttribute {
    name: &'static str,
    selector: &'static str,
    from: &'static str,
    to: &'static str,
}

impl RenameAttribute {
    pub fn new(
        name: &'static str,
        selector: &'static str,
        from: &'static str,
        to: &'static str,
    ) -> Self {
        Self {
            name,
            selector,
            from,
            to,
        }
    }

    /// `language` on code blocks is `format` in the book schema
    pub fn code_language() -> Self {
        Self::new("code-language", CODE_BLOCKS, "language", "format")
    }
}

impl Rule for RenameAttribute {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize> {
        let mut touched = 0;
        for id in arena.select(self.selector) {
            if arena.rename_attr(id, self.from, self.to)? {
                touched += 1;
            }
        }
        Ok(touched)
    }
}
