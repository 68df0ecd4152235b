//! Book XML postprocessor
//!
//! Rewrites the generic semantic XML emitted by a document compiler into the
//! publisher's book schema.
//!
//! # Pipeline
//!
//! ```text
//! raw string → Loader → Document → RuleEngine (13 ordered rules) → Serializer → XML string
//!                 ↓
//!            PassThrough (already final / no root element)
//! ```
//!
//! Every call owns its document; nothing is shared between calls.

pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod rule;
pub mod rules;

pub use config::{PostprocessorConfig, BOOK_XMLNS};
pub use error::{PostprocessError, Result};
pub use loader::{Loaded, Loader};
pub use rule::{Rule, RuleEngine};

/// Postprocessor - configuration plus the rule set it applies
pub struct Postprocessor {
    config: PostprocessorConfig,
    engine: RuleEngine,
}

impl Postprocessor {
    /// Create postprocessor with default config and the standard rules
    pub fn new() -> Self {
        Self::with_config(PostprocessorConfig::default())
    }

    /// Create postprocessor with custom config and the standard rules
    pub fn with_config(config: PostprocessorConfig) -> Self {
        Self {
            config,
            engine: RuleEngine::standard(),
        }
    }

    pub fn config(&self) -> &PostprocessorConfig {
        &self.config
    }

    /// Convert one document.
    ///
    /// Already-final input and input without a root element come back
    /// unchanged (the latter minus its doctype). Malformed XML is an error.
    pub fn process(&self, raw: &str) -> Result<String> {
        let mut doc = match Loader::new(&self.config).load(raw)? {
            Loaded::Document(doc) => doc,
            Loaded::PassThrough(output) => return Ok(output),
        };

        let touched = self.engine.run(doc.arena_mut())?;
        let output = output::serialize(&doc, &self.config)?;

        tracing::debug!(
            "[Postprocessor] Converted <{}>: {} node(s) rewritten, {} bytes out",
            doc.root_name().unwrap_or_default(),
            touched,
            output.len()
        );
        Ok(output)
    }
}

impl Default for Postprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert one document with the default configuration
pub fn process(raw: &str) -> Result<String> {
    Postprocessor::new().process(raw)
}
