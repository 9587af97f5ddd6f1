//! Population membership leaf.

use tracing::trace;

use rapidsetup_core::{EvaluationError, Result};

use super::{ConstraintEvaluator, EvaluatorKind};
use crate::context::ConstraintContext;
use crate::node::{PopulationConstraint, PopulationOperator};

/// Tests the new identity against a named population filter.
#[derive(Debug)]
pub struct PopulationEvaluator<'n> {
    constraint: &'n PopulationConstraint,
}

impl<'n> PopulationEvaluator<'n> {
    pub fn new(constraint: &'n PopulationConstraint) -> Self {
        Self { constraint }
    }

    fn population(&self) -> Result<&str> {
        self.constraint
            .population
            .as_deref()
            .ok_or_else(|| EvaluationError::invalid("Population constraint names no population"))
    }
}

impl ConstraintEvaluator for PopulationEvaluator<'_> {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Population
    }

    fn validate(&self) -> Result<()> {
        self.population().map(|_| ())
    }

    fn evaluate(&self, ctx: &ConstraintContext<'_>) -> Result<bool> {
        let name = self.population()?;
        let store = ctx.store();
        let filter = store
            .population_filter(name)
            .map_err(|e| EvaluationError::lookup(format!("population '{}'", name), e))?
            .ok_or_else(|| EvaluationError::invalid(format!("Unknown population '{}'", name)))?;

        let member = store
            .is_population_member(ctx.new_identity(), &filter)
            .map_err(|e| EvaluationError::lookup(format!("population '{}'", name), e))?;

        trace!(population = name, member, "Population membership");
        Ok(match self.constraint.operator {
            PopulationOperator::MemberOf => member,
            PopulationOperator::NotMemberOf => !member,
        })
    }
}
