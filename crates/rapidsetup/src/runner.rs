//! Batch evaluation of a business process over many identity transitions.

use tracing::{info, warn};

use rapidsetup_constraint::TriggerPredicate;
use rapidsetup_core::{IdentitySnapshot, ProcessingState, TriggerStore};

/// One identity change: the refreshed snapshot and the one before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub new_identity: IdentitySnapshot,
    /// None for an identity seen for the first time.
    pub previous_identity: Option<IdentitySnapshot>,
}

impl Transition {
    pub fn new(new_identity: IdentitySnapshot, previous_identity: Option<IdentitySnapshot>) -> Self {
        Self {
            new_identity,
            previous_identity,
        }
    }

    /// A first-seen identity.
    pub fn created(new_identity: IdentitySnapshot) -> Self {
        Self::new(new_identity, None)
    }

    /// An identity that existed before.
    pub fn updated(previous_identity: IdentitySnapshot, new_identity: IdentitySnapshot) -> Self {
        Self::new(new_identity, Some(previous_identity))
    }
}

/// An identity whose evaluation failed and was counted as not matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub identity: String,
    pub message: String,
    /// True for configuration errors, false for store failures.
    pub configuration: bool,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ids of identities for which the process fires.
    pub matched: Vec<String>,
    /// Ids of identities newly marked skipped during the run.
    pub skipped: Vec<String>,
    pub failures: Vec<RunFailure>,
}

impl RunSummary {
    /// True when no transition failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluates one process across a batch.
///
/// A failing identity is logged and treated as not matching; the rest of the
/// batch still runs. Skip marks land on the transitions' new snapshots, which
/// the caller persists.
///
/// # Example
///
/// ```ignore
/// let runner = TriggerRunner::new(&store);
/// let summary = runner.run("joiner", &mut transitions);
/// for id in &summary.matched {
///     launch_joiner(id);
/// }
/// ```
pub struct TriggerRunner<'s> {
    predicate: TriggerPredicate<'s>,
}

impl<'s> TriggerRunner<'s> {
    pub fn new(store: &'s dyn TriggerStore) -> Self {
        Self::with_predicate(TriggerPredicate::new(store))
    }

    /// Runs with a customised predicate.
    pub fn with_predicate(predicate: TriggerPredicate<'s>) -> Self {
        Self { predicate }
    }

    pub fn run(&self, process: &str, transitions: &mut [Transition]) -> RunSummary {
        let mut summary = RunSummary::default();

        for transition in transitions.iter_mut() {
            let was_skipped =
                transition.new_identity.processing_state() == Some(ProcessingState::Skipped);

            let outcome = self.predicate.evaluate(
                process,
                Some(&mut transition.new_identity),
                transition.previous_identity.as_ref(),
            );

            let identity = &transition.new_identity;
            match outcome {
                Ok(true) => summary.matched.push(identity.id.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        process,
                        identity = %identity.name,
                        error = %e,
                        "Trigger evaluation failed; treating as not matched"
                    );
                    summary.failures.push(RunFailure {
                        identity: identity.id.clone(),
                        message: e.to_string(),
                        configuration: e.is_configuration(),
                    });
                }
            }

            if !was_skipped && identity.processing_state() == Some(ProcessingState::Skipped) {
                summary.skipped.push(identity.id.clone());
            }
        }

        info!(
            event = "run_completed",
            process,
            evaluated = transitions.len() as u64,
            matched = summary.matched.len() as u64,
            skipped = summary.skipped.len() as u64,
            failed = summary.failures.len() as u64
        );
        summary
    }
}
