//! Fixed-result leaf.

use rapidsetup_core::Result;

use super::{ConstraintEvaluator, EvaluatorKind};
use crate::context::ConstraintContext;

/// Returns its configured value regardless of the identities.
#[derive(Debug, Clone, Copy)]
pub struct StaticEvaluator {
    value: bool,
}

impl StaticEvaluator {
    pub fn new(value: bool) -> Self {
        Self { value }
    }
}

impl ConstraintEvaluator for StaticEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Static
    }

    fn evaluate(&self, _ctx: &ConstraintContext<'_>) -> Result<bool> {
        Ok(self.value)
    }
}
