//! Boolean comparisons under truthiness coercion.

use rapidsetup_core::{AttributeValue, Result};

use super::compare::{apply_operator, Comparison};
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::{AttributeValueDto, Operator};
use crate::context::ConstraintContext;

/// Coerces both sides with [`AttributeValue::is_truthy`] before comparing, so
/// `"Yes"`, `1` and `true` are all equal.
#[derive(Debug)]
pub struct BooleanEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> BooleanEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for BooleanEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Boolean
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let expected = AttributeValue::from(self.dto.value()).is_truthy();
        apply_operator(self.dto, ctx, |op, actual| {
            Ok(match op {
                Operator::Equals => Comparison::from(actual.is_truthy() == expected),
                _ => Comparison::Unsupported,
            })
        })
    }
}
