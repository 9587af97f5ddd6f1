//! Value coercion and the operator driver shared by typed evaluators.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use rapidsetup_core::{AttributeValue, Result};

use crate::attribute_value::{AttributeValueDto, Operator};
use crate::context::ConstraintContext;

/// Parses a value as an exact decimal.
pub fn to_decimal(value: &AttributeValue) -> Option<Decimal> {
    match value {
        AttributeValue::Int(n) => Some(Decimal::from(*n)),
        AttributeValue::Float(n) => Decimal::try_from(*n).ok(),
        AttributeValue::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

/// Change detection on normalized values.
pub fn changed(previous: &AttributeValue, new: &AttributeValue) -> bool {
    previous.normalized() != new.normalized()
}

/// Result of testing one value against the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Matched,
    NotMatched,
    /// A side cannot be read as the comparison's data type. Never a match,
    /// negated operators included.
    Incomparable,
    /// The operator does not apply to the data type.
    Unsupported,
}

impl From<bool> for Comparison {
    fn from(matched: bool) -> Self {
        if matched {
            Comparison::Matched
        } else {
            Comparison::NotMatched
        }
    }
}

impl From<Option<bool>> for Comparison {
    fn from(matched: Option<bool>) -> Self {
        matched.map_or(Comparison::Unsupported, Comparison::from)
    }
}

/// Applies an operator to one attribute, delegating scalar tests to `test`.
///
/// `test` implements the positive operators (`Equals`, `Contains`, `StartsWith`,
/// `EndsWith` and the orderings) against a single value. Negations,
/// multi-valued attributes and the `ChangedFrom`/`ChangedTo` transitions are
/// handled here. Incomparable and unsupported outcomes evaluate to false before
/// any negation is applied.
pub fn apply_operator<F>(
    dto: &AttributeValueDto,
    ctx: &ConstraintContext<'_>,
    test: F,
) -> Result<bool>
where
    F: Fn(Operator, &AttributeValue) -> Result<Comparison>,
{
    let Some(operator) = dto.operator() else {
        return Ok(false);
    };
    let new = ctx.new_value(dto.property());

    let (comparison, negated) = match operator {
        Operator::Changed => (changed(&ctx.previous_value(dto.property()), &new).into(), false),
        Operator::NotChanged => (changed(&ctx.previous_value(dto.property()), &new).into(), true),
        Operator::ChangedFrom => {
            let previous = ctx.previous_value(dto.property());
            let comparison = any_value(Operator::Equals, &previous, &test)?;
            (transition(comparison, &previous, &new), false)
        }
        Operator::ChangedTo => {
            let previous = ctx.previous_value(dto.property());
            let comparison = any_value(Operator::Equals, &new, &test)?;
            (transition(comparison, &previous, &new), false)
        }
        Operator::NotEquals => (any_value(Operator::Equals, &new, &test)?, true),
        Operator::NotContains => (any_value(Operator::Contains, &new, &test)?, true),
        other => (any_value(other, &new, &test)?, false),
    };

    match comparison {
        Comparison::Matched => Ok(!negated),
        Comparison::NotMatched => Ok(negated),
        Comparison::Incomparable => {
            debug!(
                property = dto.property(),
                operator = %operator,
                data_type = ?dto.data_type(),
                "Values not comparable"
            );
            Ok(false)
        }
        Comparison::Unsupported => {
            warn!(
                property = dto.property(),
                operator = %operator,
                data_type = ?dto.data_type(),
                "Operator not supported for data type"
            );
            Ok(false)
        }
    }
}

fn transition(comparison: Comparison, previous: &AttributeValue, new: &AttributeValue) -> Comparison {
    match comparison {
        Comparison::Matched => changed(previous, new).into(),
        other => other,
    }
}

// Multi-valued attributes match when any element matches; `Contains` on a
// multi-valued attribute is a membership test.
fn any_value<F>(operator: Operator, value: &AttributeValue, test: &F) -> Result<Comparison>
where
    F: Fn(Operator, &AttributeValue) -> Result<Comparison>,
{
    match value {
        AttributeValue::List(items) => {
            let operator = if operator == Operator::Contains {
                Operator::Equals
            } else {
                operator
            };
            if items.is_empty() {
                return test(operator, &AttributeValue::Null);
            }
            let mut outcome = Comparison::Unsupported;
            for item in items {
                match test(operator, item)? {
                    Comparison::Matched => return Ok(Comparison::Matched),
                    Comparison::NotMatched => outcome = Comparison::NotMatched,
                    Comparison::Incomparable if outcome == Comparison::Unsupported => {
                        outcome = Comparison::Incomparable
                    }
                    _ => {}
                }
            }
            Ok(outcome)
        }
        scalar => test(operator, scalar),
    }
}

/// Maps an ordering result onto an ordering operator.
pub fn ordering_matches(operator: Operator, ordering: std::cmp::Ordering) -> Option<bool> {
    match operator {
        Operator::Equals => Some(ordering.is_eq()),
        Operator::GreaterThan => Some(ordering.is_gt()),
        Operator::GreaterThanOrEqual => Some(ordering.is_ge()),
        Operator::LessThan => Some(ordering.is_lt()),
        Operator::LessThanOrEqual => Some(ordering.is_le()),
        _ => None,
    }
}

/// Returns true for operators [`ordering_matches`] understands.
pub fn is_ordering(operator: Operator) -> bool {
    matches!(
        operator,
        Operator::Equals
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual
            | Operator::LessThan
            | Operator::LessThanOrEqual
    )
}
