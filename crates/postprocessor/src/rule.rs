//! Rule System - ordered structural rewrites
//!
//! Each rewrite is a small `Rule` that walks the current tree and edits it
//! in place. The `RuleEngine` owns them as a `Vec<Box<dyn Rule>>` and runs
//! them strictly in registration order: later rules select on names that
//! earlier rules produce, so the order is part of the contract.

use dom::DomArena;

use crate::error::{PostprocessError, Result};
use crate::rules;

/// A single tree rewrite
pub trait Rule {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Apply the rewrite to the live tree.
    ///
    /// Returns how many nodes were touched. Absent structure is not an
    /// error: a rule with nothing to do returns `Ok(0)`.
    fn apply(&self, arena: &mut DomArena) -> dom::Result<usize>;
}

/// Runs rules in order over one document
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The publisher's rule set, in the order it must run
    pub fn standard() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(rules::RenameElements::standard()));
        engine.register(Box::new(rules::PruneMetadata::standard()));
        engine.register(Box::new(rules::PartIntro));
        engine.register(Box::new(rules::RenameAttribute::code_language()));
        engine.register(Box::new(rules::FormalListings));
        engine.register(Box::new(rules::InformalListings));
        engine.register(Box::new(rules::HoistAppendices));
        engine.register(Box::new(rules::AttachCalloutLists));
        engine.register(Box::new(rules::WrapHeaderCells));
        engine.register(Box::new(rules::FlattenAttributions));
        engine.register(Box::new(rules::WrapBlockquotes));
        engine.register(Box::new(rules::LabelCrossReferences));
        engine.register(Box::new(rules::RemoveElements::column_specs()));
        engine
    }

    /// Add a rule after the ones already registered
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        tracing::debug!("[RuleEngine] Registered rule: {}", rule.name());
        self.rules.push(rule);
    }

    /// Rule names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule once, in order. Returns the total nodes touched.
    pub fn run(&self, arena: &mut DomArena) -> Result<usize> {
        let mut total = 0;
        for rule in &self.rules {
            let touched = rule.apply(arena).map_err(|source| PostprocessError::Rule {
                rule: rule.name().to_string(),
                source,
            })?;
            if touched > 0 {
                tracing::debug!("[RuleEngine] {}: {} node(s)", rule.name(), touched);
            }
            total += touched;
        }
        Ok(total)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
