//! Case-insensitive string comparisons.

use rapidsetup_core::{AttributeValue, Result};

use super::compare::{apply_operator, is_ordering, ordering_matches, Comparison};
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::{AttributeValueDto, Operator};
use crate::context::ConstraintContext;

#[derive(Debug)]
pub struct StringEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> StringEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for StringEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::String
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let expected = lowered(&AttributeValue::from(self.dto.value()));
        apply_operator(self.dto, ctx, |op, actual| {
            Ok(Comparison::from(compare_text(
                op,
                lowered(actual).as_deref(),
                expected.as_deref(),
            )))
        })
    }
}

fn lowered(value: &AttributeValue) -> Option<String> {
    value
        .normalized()
        .to_text()
        .map(|s| s.to_lowercase())
}

fn compare_text(op: Operator, actual: Option<&str>, expected: Option<&str>) -> Option<bool> {
    if !is_text_operator(op) {
        return None;
    }
    let (actual, expected) = match (actual, expected) {
        (Some(a), Some(e)) => (a, e),
        // An empty literal matches an unset attribute
        (None, None) => return Some(op == Operator::Equals),
        _ => return Some(false),
    };

    match op {
        Operator::Contains => Some(actual.contains(expected)),
        Operator::StartsWith => Some(actual.starts_with(expected)),
        Operator::EndsWith => Some(actual.ends_with(expected)),
        other => ordering_matches(other, actual.cmp(expected)),
    }
}

fn is_text_operator(op: Operator) -> bool {
    is_ordering(op) || matches!(op, Operator::Contains | Operator::StartsWith | Operator::EndsWith)
}
