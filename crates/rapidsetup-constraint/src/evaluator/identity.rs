//! Identity-reference comparisons.

use rapidsetup_core::{AttributeValue, EvaluationError, Result};

use super::compare::{apply_operator, Comparison};
use super::{ConstraintEvaluator, EvaluatorKind};
use crate::attribute_value::{AttributeValueDto, Operator};
use crate::context::ConstraintContext;

/// Compares identity references by id. Names on either side are resolved
/// through the store; anything unresolvable never matches.
#[derive(Debug)]
pub struct IdentityEvaluator<'n> {
    dto: &'n AttributeValueDto,
}

impl<'n> IdentityEvaluator<'n> {
    pub fn new(dto: &'n AttributeValueDto) -> Self {
        Self { dto }
    }
}

impl ConstraintEvaluator for IdentityEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Identity
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let literal = AttributeValue::from(self.dto.value());
        let expected = reference(ctx, &literal)?;
        apply_operator(self.dto, ctx, |op, actual| {
            if op != Operator::Equals {
                return Ok(Comparison::Unsupported);
            }
            Ok(match (reference(ctx, actual)?, &expected) {
                (Reference::Resolved(a), Reference::Resolved(e)) => Comparison::from(&a == e),
                (Reference::Unset, Reference::Unset) => Comparison::Matched,
                (Reference::Unresolved, _) | (_, Reference::Unresolved) => Comparison::Incomparable,
                _ => Comparison::NotMatched,
            })
        })
    }
}

/// An identity reference read from an attribute or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reference {
    Unset,
    Resolved(String),
    /// Names something the store does not know.
    Unresolved,
}

fn reference(ctx: &ConstraintContext<'_>, value: &AttributeValue) -> Result<Reference> {
    match value.normalized() {
        AttributeValue::Null => Ok(Reference::Unset),
        AttributeValue::Identity(r) => Ok(Reference::Resolved(r.id)),
        AttributeValue::String(name) => ctx
            .store()
            .find_identity(&name)
            .map(|found| found.map_or(Reference::Unresolved, |r| Reference::Resolved(r.id)))
            .map_err(|e| EvaluationError::lookup(format!("identity '{}'", name), e)),
        _ => Ok(Reference::Unresolved),
    }
}
