//! Process-specific pre-filters run before the configured trigger filter.

use std::fmt::Debug;

use tracing::trace;

use rapidsetup_core::{EvaluationError, IdentitySnapshot, ProcessingState, Result, TriggerStore};

use crate::precedence::{JOINER, LEAVER, MOVER};

/// Verdict of an implicit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// Do not fire. No side effect.
    CancelImmediately,
    /// Do not fire, and mark the identity skipped.
    CancelAndMarkSkip,
    /// Fire without consulting the trigger filter.
    PerformImmediately,
    /// Evaluate the trigger filter; an unconfigured filter does not fire.
    Continue,
    /// Evaluate the trigger filter; an unconfigured filter fires.
    ContinueOpt,
}

/// Inputs available to an implicit check.
#[derive(Clone, Copy)]
pub struct ImplicitCheckInput<'a> {
    pub process: &'a str,
    pub store: &'a dyn TriggerStore,
    pub new_identity: &'a IdentitySnapshot,
    pub previous_identity: Option<&'a IdentitySnapshot>,
}

/// A code-defined pre-filter for one business process.
pub trait ImplicitCheck: Debug + Send + Sync {
    fn check(&self, input: &ImplicitCheckInput<'_>) -> Result<Shortcut>;
}

/// Joiner runs once per identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinerImplicitCheck;

impl ImplicitCheck for JoinerImplicitCheck {
    fn check(&self, input: &ImplicitCheckInput<'_>) -> Result<Shortcut> {
        let identity = input.new_identity;
        let shortcut = match identity.processing_state() {
            Some(ProcessingState::Processed) => Shortcut::CancelImmediately,
            Some(ProcessingState::NeedsProcessing) => Shortcut::PerformImmediately,
            Some(ProcessingState::Skipped) => {
                let path = format!("businessProcesses.{}.reprocessSkipped", input.process);
                let reprocess = input
                    .store
                    .get_boolean(&path)
                    .map_err(|e| EvaluationError::lookup(path, e))?;
                if reprocess {
                    new_or_existing(input)
                } else {
                    Shortcut::CancelImmediately
                }
            }
            None => new_or_existing(input),
        };
        trace!(identity = %identity.name, ?shortcut, "Joiner implicit check");
        Ok(shortcut)
    }
}

fn new_or_existing(input: &ImplicitCheckInput<'_>) -> Shortcut {
    match input.previous_identity {
        None if input.new_identity.is_inactive() => Shortcut::CancelAndMarkSkip,
        None => Shortcut::ContinueOpt,
        Some(_) => Shortcut::Continue,
    }
}

/// Mover and Leaver only apply to identities that existed before.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingIdentityImplicitCheck;

impl ImplicitCheck for ExistingIdentityImplicitCheck {
    fn check(&self, input: &ImplicitCheckInput<'_>) -> Result<Shortcut> {
        Ok(match input.previous_identity {
            None => Shortcut::CancelImmediately,
            Some(_) => Shortcut::Continue,
        })
    }
}

/// Processes without built-in rules go straight to their trigger filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImplicitCheck;

impl ImplicitCheck for DefaultImplicitCheck {
    fn check(&self, _input: &ImplicitCheckInput<'_>) -> Result<Shortcut> {
        Ok(Shortcut::Continue)
    }
}

/// Creates the implicit check for a process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitCheckFactory;

impl ImplicitCheckFactory {
    pub fn for_process(process: &str) -> Box<dyn ImplicitCheck> {
        let process = process.trim();
        if process.eq_ignore_ascii_case(JOINER) {
            Box::new(JoinerImplicitCheck)
        } else if process.eq_ignore_ascii_case(MOVER) || process.eq_ignore_ascii_case(LEAVER) {
            Box::new(ExistingIdentityImplicitCheck)
        } else {
            Box::new(DefaultImplicitCheck)
        }
    }
}
