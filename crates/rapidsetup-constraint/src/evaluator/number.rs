//! Numeric comparisons on exact decimals.

use rapidsetup_core::{AttributeValue, Result};

use super::compare::{apply_operator, is_ordering, ordering_matches, to_decimal, Comparison};
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::AttributeValueDto;
use crate::context::ConstraintContext;

/// Parses both sides as decimals; a non-numeric side never matches, even
/// under `NotEquals`.
#[derive(Debug)]
pub struct NumberEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> NumberEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for NumberEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Number
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let expected = to_decimal(&AttributeValue::from(self.dto.value()));
        apply_operator(self.dto, ctx, |op, actual| {
            if !is_ordering(op) {
                return Ok(Comparison::Unsupported);
            }
            Ok(match (to_decimal(actual), expected) {
                (Some(a), Some(e)) => ordering_matches(op, a.cmp(&e)).into(),
                _ => Comparison::Incomparable,
            })
        })
    }
}
