//! Error types for the postprocessor

use dom::DomError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostprocessError>;

#[derive(Debug, Error)]
pub enum PostprocessError {
    /// Input could not be parsed or rendered
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    /// A rewrite rule hit an inconsistent tree
    #[error("Rule '{rule}' failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: DomError,
    },
}
