//! In-memory trigger store that records the calls made against it.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use rapidsetup_config::{BusinessProcessConfig, RapidSetupConfig};
use rapidsetup_core::{
    IdentityRef, IdentitySnapshot, PopulationFilter, StoreError, TriggerDefinition, TriggerStore,
};
use serde_json::Value;

/// A call observed by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetBoolean(String),
    MatchFilter(String),
    TriggerDefinition(String),
    PopulationFilter(String),
    PopulationMember { population: String, identity: String },
    FindIdentity(String),
}

/// Configuration-backed store for tests.
///
/// Populations are explicit member lists keyed by identity name. Lookups for
/// names registered with [`fail_on`](Self::fail_on) return a backend error.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    config: RapidSetupConfig,
    triggers: HashMap<String, TriggerDefinition>,
    populations: HashMap<String, BTreeSet<String>>,
    identities: Vec<IdentityRef>,
    failing: BTreeSet<String>,
    calls: Mutex<Vec<StoreCall>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over an existing configuration.
    pub fn with_config(config: RapidSetupConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Enables a process with the given trigger filter and an active trigger.
    pub fn with_process(mut self, process: &str, filter: Option<Value>) -> Self {
        let mut settings = BusinessProcessConfig::enabled();
        settings.trigger_filter = filter;
        self.config = self.config.with_process(process, settings);
        self.with_trigger(process, TriggerDefinition::new(true, false))
    }

    /// Registers a process that is configured but switched off.
    pub fn with_disabled_process(mut self, process: &str, filter: Option<Value>) -> Self {
        let mut settings = BusinessProcessConfig::disabled();
        settings.trigger_filter = filter;
        self.config = self.config.with_process(process, settings);
        self
    }

    /// Sets the reprocess-skipped override of a configured process.
    pub fn with_reprocess_skipped(mut self, process: &str) -> Self {
        if let Some(settings) = self.config.business_processes.get_mut(process) {
            settings.reprocess_skipped = true;
        }
        self
    }

    /// Registers the trigger definition backing a process.
    pub fn with_trigger(mut self, process: &str, definition: TriggerDefinition) -> Self {
        self.triggers.insert(trigger_name(process), definition);
        self
    }

    /// Removes the trigger definition backing a process.
    pub fn without_trigger(mut self, process: &str) -> Self {
        self.triggers.remove(&trigger_name(process));
        self
    }

    /// Registers a population and its members by identity name.
    pub fn with_population(mut self, name: &str, members: &[&str]) -> Self {
        self.populations.insert(
            name.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    /// Registers an identity resolvable by id or name.
    pub fn with_identity(mut self, id: &str, name: &str) -> Self {
        self.identities.push(IdentityRef::new(id, name));
        self
    }

    /// Makes every lookup naming `name` fail.
    pub fn fail_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Returns the calls recorded so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Counts recorded calls matching a predicate.
    pub fn count_calls(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    /// Number of population membership tests performed.
    pub fn membership_checks(&self) -> usize {
        self.count_calls(|c| matches!(c, StoreCall::PopulationMember { .. }))
    }

    /// Number of trigger filter lookups performed for `process`.
    pub fn filter_lookups(&self, process: &str) -> usize {
        self.count_calls(|c| matches!(c, StoreCall::MatchFilter(p) if p == process))
    }

    pub fn config(&self) -> &RapidSetupConfig {
        &self.config
    }

    fn record(&self, call: StoreCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check_failure(&self, name: &str) -> Result<(), StoreError> {
        if self.failing.contains(name) {
            return Err(StoreError::Backend(format!("lookup of {} failed", name)));
        }
        Ok(())
    }
}

/// Mirrors the engine's trigger naming: `RapidSetup <Process>`.
fn trigger_name(process: &str) -> String {
    let mut chars = process.chars();
    match chars.next() {
        Some(first) => format!(
            "RapidSetup {}{}",
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ),
        None => "RapidSetup ".to_string(),
    }
}

impl TriggerStore for InMemoryStore {
    fn get_boolean(&self, path: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::GetBoolean(path.to_string()));
        self.check_failure(path)?;
        self.config
            .get_boolean(path)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn match_filter(&self, process: &str) -> Result<Option<Value>, StoreError> {
        self.record(StoreCall::MatchFilter(process.to_string()));
        self.check_failure(process)?;
        Ok(self.config.match_filter(process).cloned())
    }

    fn trigger_definition(&self, name: &str) -> Result<Option<TriggerDefinition>, StoreError> {
        self.record(StoreCall::TriggerDefinition(name.to_string()));
        self.check_failure(name)?;
        Ok(self.triggers.get(name).copied())
    }

    fn population_filter(&self, name: &str) -> Result<Option<PopulationFilter>, StoreError> {
        self.record(StoreCall::PopulationFilter(name.to_string()));
        self.check_failure(name)?;
        Ok(self
            .populations
            .contains_key(name)
            .then(|| PopulationFilter::new(name, format!("members of {}", name))))
    }

    fn is_population_member(
        &self,
        identity: &IdentitySnapshot,
        filter: &PopulationFilter,
    ) -> Result<bool, StoreError> {
        self.record(StoreCall::PopulationMember {
            population: filter.name.clone(),
            identity: identity.name.clone(),
        });
        Ok(self
            .populations
            .get(&filter.name)
            .is_some_and(|members| members.contains(&identity.name)))
    }

    fn find_identity(&self, id_or_name: &str) -> Result<Option<IdentityRef>, StoreError> {
        self.record(StoreCall::FindIdentity(id_or_name.to_string()));
        self.check_failure(id_or_name)?;
        Ok(self
            .identities
            .iter()
            .find(|r| r.id == id_or_name || r.name.eq_ignore_ascii_case(id_or_name))
            .cloned())
    }
}
