//! Boolean combinators (AND/OR).
//!
//! Children are evaluated in configured order with short-circuiting. An empty
//! child list is a configuration error, never a vacuous result.

use rapidsetup_core::{EvaluationError, Result};

use super::{ConstraintEvaluator, EvaluatorKind};
use crate::context::ConstraintContext;
use crate::node::ConstraintNode;

/// True when every child is true. Stops at the first false child.
#[derive(Debug)]
pub struct AndEvaluator<'n> {
    items: &'n [ConstraintNode],
}

impl<'n> AndEvaluator<'n> {
    pub fn new(items: &'n [ConstraintNode]) -> Self {
        Self { items }
    }
}

impl ConstraintEvaluator for AndEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::And
    }

    fn validate(&self) -> Result<()> {
        require_items(self.items, "AND")
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        for item in self.items {
            if !ctx.evaluate(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// True when any child is true. Stops at the first true child.
#[derive(Debug)]
pub struct OrEvaluator<'n> {
    items: &'n [ConstraintNode],
}

impl<'n> OrEvaluator<'n> {
    pub fn new(items: &'n [ConstraintNode]) -> Self {
        Self { items }
    }
}

impl ConstraintEvaluator for OrEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Or
    }

    fn validate(&self) -> Result<()> {
        require_items(self.items, "OR")
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        for item in self.items {
            if ctx.evaluate(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn require_items(items: &[ConstraintNode], operation: &str) -> Result<()> {
    if items.is_empty() {
        return Err(EvaluationError::invalid(format!(
            "{} group has no items",
            operation
        )));
    }
    Ok(())
}
