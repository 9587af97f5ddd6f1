//! Constraint evaluators and the registry that selects them.
//!
//! Each decoded [`ConstraintNode`] maps to exactly one evaluator. Attribute nodes
//! are dispatched on operator first (change detection ignores the data type) and
//! then on effective data type.

mod boolean;
mod change;
mod compare;
mod date;
mod identity;
mod logical;
mod number;
mod population;
mod static_value;
mod string;

use std::fmt::Debug;

use rapidsetup_core::{EvaluationError, Result};

use crate::attribute_value::{AttributeValueDto, DataType};
use crate::context::ConstraintContext;
use crate::node::{BooleanOperation, ConstraintNode};

pub use boolean::BooleanEvaluator;
pub use change::GenericChangeEvaluator;
pub use date::{java_pattern_to_chrono, DateEvaluator};
pub use identity::IdentityEvaluator;
pub use logical::{AndEvaluator, OrEvaluator};
pub use number::NumberEvaluator;
pub use population::PopulationEvaluator;
pub use static_value::StaticEvaluator;
pub use string::StringEvaluator;

/// Concrete evaluator selected for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluatorKind {
    And,
    Or,
    Population,
    Static,
    String,
    Number,
    Boolean,
    Date,
    Identity,
    GenericChange,
}

/// Contract shared by every node of a constraint tree.
pub trait ConstraintEvaluator: Debug {
    /// Which evaluator this is.
    fn kind(&self) -> EvaluatorKind;

    /// Checks the node's configuration before evaluation.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Evaluates the node against the identities held by `ctx`.
    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool>;
}

/// Selects the evaluator for a node. Empty nodes have none.
pub fn evaluator_for(node: &ConstraintNode) -> Result<Option<Box<dyn ConstraintEvaluator + '_>>> {
    let evaluator: Box<dyn ConstraintEvaluator + '_> = match node {
        ConstraintNode::Empty => return Ok(None),
        ConstraintNode::Group {
            operation: BooleanOperation::And,
            items,
        } => Box::new(AndEvaluator::new(items)),
        ConstraintNode::Group {
            operation: BooleanOperation::Or,
            items,
        } => Box::new(OrEvaluator::new(items)),
        ConstraintNode::Population(population) => Box::new(PopulationEvaluator::new(population)),
        ConstraintNode::Attribute(dto) => attribute_evaluator(dto)?,
        ConstraintNode::Static(value) => Box::new(StaticEvaluator::new(*value)),
    };
    Ok(Some(evaluator))
}

/// Selects the evaluator for an attribute comparison.
///
/// # Errors
///
/// Fails with a configuration error naming the property when the descriptor
/// lacks a property, an operator, or a resolvable data type.
pub fn attribute_evaluator(dto: &AttributeValueDto) -> Result<Box<dyn ConstraintEvaluator + '_>> {
    let unresolved = || {
        EvaluationError::invalid(format!(
            "Unable to resolve attribute evaluator for property '{}'",
            dto.property()
        ))
    };

    if !dto.is_valid() {
        return Err(unresolved());
    }
    if dto.operator().is_some_and(|op| op.is_change_detection()) {
        return Ok(Box::new(GenericChangeEvaluator::new(dto)));
    }

    let evaluator: Box<dyn ConstraintEvaluator + '_> = match dto.data_type().ok_or_else(unresolved)? {
        DataType::Date => Box::new(DateEvaluator::new(dto)),
        DataType::Boolean => Box::new(BooleanEvaluator::new(dto)),
        DataType::String => Box::new(StringEvaluator::new(dto)),
        DataType::Number => Box::new(NumberEvaluator::new(dto)),
        DataType::Identity => Box::new(IdentityEvaluator::new(dto)),
    };
    Ok(evaluator)
}
