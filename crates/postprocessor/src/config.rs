//! Postprocessor configuration
//!
//! Plain data with sensible defaults. The host pipeline never supplies a
//! config file; `Default` is what production runs with.

use serde::{Deserialize, Serialize};

/// Namespace of the publisher's book schema
pub const BOOK_XMLNS: &str = "http://www.manning.com/schemas/book";

/// Inputs starting with this are already final and pass through untouched
pub const HTML_DOCTYPE: &str = "<!DOCTYPE html>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessorConfig {
    /// Default namespace set on the output root
    pub namespace: String,
    /// Spaces per indentation level in the output
    pub indent: usize,
    /// Prefix marking an input as already processed
    pub pass_through_marker: String,
    /// Element used to wrap a bare paragraph fragment
    pub fragment_root: String,
}

impl Default for PostprocessorConfig {
    fn default() -> Self {
        Self {
            namespace: BOOK_XMLNS.to_string(),
            indent: 2,
            pass_through_marker: HTML_DOCTYPE.to_string(),
            fragment_root: "preface".to_string(),
        }
    }
}
