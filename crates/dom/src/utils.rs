//! Utility functions for tree processing

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::NodeId;

/// Get all text content (text and CDATA) from node and its children
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if node.is_character_data() {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}

/// True if `tokens` (a space-separated list such as a `role` value) holds `token`
pub fn has_token(tokens: &str, token: &str) -> bool {
    tokens.split_ascii_whitespace().any(|t| t == token)
}

/// Upper-case the first character, leave the rest alone
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
