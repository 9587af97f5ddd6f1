//! The evaluation driver for constraint trees.

use std::cell::Cell;

use serde_json::Value;
use tracing::debug;

use rapidsetup_core::{AttributeValue, IdentitySnapshot, Result, TriggerStore};

use crate::evaluator::evaluator_for;
use crate::node::{self, ConstraintNode, DEFAULT_MAX_DEPTH};

/// Holds the identities and store for one evaluation and walks a constraint
/// tree, dispatching each node to its evaluator.
///
/// A context is built per evaluation call and discarded afterwards.
pub struct ConstraintContext<'a> {
    store: &'a dyn TriggerStore,
    new_identity: &'a IdentitySnapshot,
    previous_identity: Option<&'a IdentitySnapshot>,
    max_depth: usize,
    depth: Cell<usize>,
}

impl<'a> ConstraintContext<'a> {
    pub fn new(
        store: &'a dyn TriggerStore,
        new_identity: &'a IdentitySnapshot,
        previous_identity: Option<&'a IdentitySnapshot>,
    ) -> Self {
        Self {
            store,
            new_identity,
            previous_identity,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
        }
    }

    /// Overrides the nesting limit applied when decoding raw configuration.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn store(&self) -> &'a dyn TriggerStore {
        self.store
    }

    pub fn new_identity(&self) -> &'a IdentitySnapshot {
        self.new_identity
    }

    pub fn previous_identity(&self) -> Option<&'a IdentitySnapshot> {
        self.previous_identity
    }

    /// Value of `property` on the new identity.
    pub fn new_value(&self, property: &str) -> AttributeValue {
        self.new_identity.get(property)
    }

    /// Value of `property` on the previous identity; Null when there is none.
    pub fn previous_value(&self, property: &str) -> AttributeValue {
        self.previous_identity
            .map(|identity| identity.get(property))
            .unwrap_or(AttributeValue::Null)
    }

    /// Decodes and evaluates a raw configuration node.
    ///
    /// A null or empty node evaluates to false; callers decide the higher-level
    /// default.
    pub fn evaluate_config(&self, config: &Value) -> Result<bool> {
        if node::is_blank(config) {
            debug!("No constraint configured");
            return Ok(false);
        }
        let node = ConstraintNode::parse_with_limit(config, self.max_depth)?;
        self.evaluate(&node)
    }

    /// Evaluates a decoded node, recursing through groups.
    pub fn evaluate(&self, node: &ConstraintNode) -> Result<bool> {
        let depth = self.depth.get();
        debug!(depth, node = node.label(), "Evaluating constraint");

        let Some(evaluator) = evaluator_for(node)? else {
            debug!(depth, result = false, "Empty constraint");
            return Ok(false);
        };
        evaluator.validate()?;

        self.depth.set(depth + 1);
        let result = evaluator.evaluate(self);
        self.depth.set(depth);
        let result = result?;

        debug!(depth, kind = ?evaluator.kind(), result, "Constraint evaluated");
        Ok(result)
    }
}
