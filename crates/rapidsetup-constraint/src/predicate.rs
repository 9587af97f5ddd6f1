//! Top-level trigger decision for a business process.

use serde_json::Value;
use tracing::{debug, info, warn};

use rapidsetup_core::{EvaluationError, IdentitySnapshot, ProcessingState, Result, TriggerStore};

use crate::context::ConstraintContext;
use crate::implicit::{ImplicitCheck, ImplicitCheckFactory, ImplicitCheckInput, Shortcut};
use crate::node::DEFAULT_MAX_DEPTH;
use crate::precedence::{is_joiner, TriggerPrecedence};

/// Produces the implicit check for a process.
pub type ImplicitCheckSource = fn(&str) -> Box<dyn ImplicitCheck>;

/// Outcome of consulting a process's configured trigger filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterVerdict {
    /// No filter, no `group`, or a group without items.
    Unconfigured,
    Evaluated(bool),
}

/// Decides whether a business process fires for an identity transition.
///
/// Per call: process-independent guards, the process's implicit check, its
/// trigger filter, then a re-check of every higher-precedence process so at most
/// one of Leaver, Joiner and Mover fires for a transition.
///
/// # Example
///
/// ```ignore
/// let predicate = TriggerPredicate::new(&store);
/// if predicate.evaluate("joiner", Some(&mut identity), previous.as_ref())? {
///     // launch the joiner workflow
/// }
/// ```
pub struct TriggerPredicate<'s> {
    store: &'s dyn TriggerStore,
    implicit_checks: ImplicitCheckSource,
    max_depth: usize,
}

impl<'s> TriggerPredicate<'s> {
    pub fn new(store: &'s dyn TriggerStore) -> Self {
        Self {
            store,
            implicit_checks: ImplicitCheckFactory::for_process,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces the implicit-check factory.
    pub fn with_implicit_checks(mut self, source: ImplicitCheckSource) -> Self {
        self.implicit_checks = source;
        self
    }

    /// Overrides the trigger filter nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluates the trigger for `process`, enforcing precedence.
    ///
    /// May set the identity's processing state to `skipped`; persisting that
    /// change is the caller's job.
    ///
    /// # Errors
    ///
    /// Configuration errors in a trigger filter and failures of the store are
    /// returned; anticipated "not configured" conditions are not errors.
    pub fn evaluate(
        &self,
        process: &str,
        mut new_identity: Option<&mut IdentitySnapshot>,
        previous_identity: Option<&IdentitySnapshot>,
    ) -> Result<bool> {
        let mut result = self.do_evaluate(process, new_identity.as_deref_mut(), previous_identity)?;

        if result {
            for higher in TriggerPrecedence::ordered_check_first_list(process) {
                if !self.is_trigger_enabled(higher)? {
                    continue;
                }
                if self.do_evaluate(higher, new_identity.as_deref_mut(), previous_identity)? {
                    debug!(process, higher, "Suppressed by higher precedence process");
                    result = false;
                    break;
                }
            }
        }

        info!(
            event = "trigger_evaluated",
            process,
            identity = new_identity.as_deref().map(|i| i.name.as_str()).unwrap_or(""),
            result
        );
        Ok(result)
    }

    /// Evaluates one process without precedence: guards, implicit check, filter.
    fn do_evaluate(
        &self,
        process: &str,
        new_identity: Option<&mut IdentitySnapshot>,
        previous_identity: Option<&IdentitySnapshot>,
    ) -> Result<bool> {
        if process.trim().is_empty() {
            debug!("No business process named");
            return Ok(false);
        }

        let enabled_path = format!("businessProcesses.{}.enabled", process);
        let enabled = self
            .store
            .get_boolean(&enabled_path)
            .map_err(|e| EvaluationError::lookup(enabled_path, e))?;
        if !enabled {
            debug!(process, "Business process disabled");
            return Ok(false);
        }

        let Some(identity) = new_identity else {
            debug!(process, "No new identity");
            return Ok(false);
        };
        if !identity.is_human() {
            debug!(process, identity = %identity.name, "Identity is not human");
            return Ok(false);
        }

        let shortcut = (self.implicit_checks)(process).check(&ImplicitCheckInput {
            process,
            store: self.store,
            new_identity: &*identity,
            previous_identity,
        })?;
        debug!(process, identity = %identity.name, ?shortcut, "Implicit check");

        match shortcut {
            Shortcut::CancelImmediately => Ok(false),
            Shortcut::CancelAndMarkSkip => {
                identity.set_processing_state(ProcessingState::Skipped);
                Ok(false)
            }
            Shortcut::PerformImmediately => Ok(true),
            Shortcut::Continue | Shortcut::ContinueOpt => {
                match self.evaluate_filter(process, &*identity, previous_identity)? {
                    FilterVerdict::Unconfigured => {
                        let opted_in = shortcut == Shortcut::ContinueOpt;
                        if !opted_in {
                            warn!(process, "No trigger filter configured");
                        }
                        Ok(opted_in)
                    }
                    FilterVerdict::Evaluated(true) => Ok(true),
                    FilterVerdict::Evaluated(false) => {
                        // Keeps the identity from being re-evaluated by a Joiner
                        // that ignores skipped identities
                        if is_joiner(process) {
                            identity.set_processing_state(ProcessingState::Skipped);
                        }
                        Ok(false)
                    }
                }
            }
        }
    }

    fn evaluate_filter(
        &self,
        process: &str,
        identity: &IdentitySnapshot,
        previous_identity: Option<&IdentitySnapshot>,
    ) -> Result<FilterVerdict> {
        let filter = self
            .store
            .match_filter(process)
            .map_err(|e| EvaluationError::lookup(format!("trigger filter of '{}'", process), e))?;

        let Some(group) = filter.as_ref().and_then(|f| f.get("group")) else {
            return Ok(FilterVerdict::Unconfigured);
        };
        let has_items = group
            .get("items")
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty());
        if !has_items {
            return Ok(FilterVerdict::Unconfigured);
        }

        let ctx = ConstraintContext::new(self.store, identity, previous_identity)
            .with_max_depth(self.max_depth);
        ctx.evaluate_config(group).map(FilterVerdict::Evaluated)
    }

    fn is_trigger_enabled(&self, process: &str) -> Result<bool> {
        let name = TriggerPrecedence::trigger_name(process);
        let definition = self
            .store
            .trigger_definition(&name)
            .map_err(|e| EvaluationError::lookup(format!("trigger '{}'", name), e))?;
        Ok(definition.is_some_and(|d| d.is_active()))
    }
}

/// Evaluates the trigger for `process` with the default implicit checks.
pub fn evaluate_trigger(
    process: &str,
    store: &dyn TriggerStore,
    new_identity: Option<&mut IdentitySnapshot>,
    previous_identity: Option<&IdentitySnapshot>,
) -> Result<bool> {
    TriggerPredicate::new(store).evaluate(process, new_identity, previous_identity)
}
