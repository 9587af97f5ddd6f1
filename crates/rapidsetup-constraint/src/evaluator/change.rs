//! Type-agnostic change detection.

use tracing::trace;

use rapidsetup_core::Result;

use super::compare::changed;
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::{AttributeValueDto, Operator};
use crate::context::ConstraintContext;

/// Handles `Changed` and `NotChanged` for every data type. Only difference
/// between previous and new values matters, not their meaning.
#[derive(Debug)]
pub struct GenericChangeEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> GenericChangeEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for GenericChangeEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::GenericChange
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let property = self.dto.property();
        let previous = ctx.previous_value(property);
        let new = ctx.new_value(property);
        let differs = changed(&previous, &new);
        trace!(property, ?previous, ?new, differs, "Change detection");

        Ok(match self.dto.operator() {
            Some(Operator::Changed) => differs,
            Some(Operator::NotChanged) => !differs,
            _ => false,
        })
    }
}
