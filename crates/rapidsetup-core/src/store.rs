//! The persistence collaborator consumed by trigger evaluation.
//!
//! Implementations own configuration lookup, object resolution and population
//! membership. Evaluation never commits anything through this trait; the only
//! mutation it performs happens on the in-memory [`IdentitySnapshot`].

use serde_json::Value;

use crate::error::StoreError;
use crate::identity::IdentitySnapshot;
use crate::value::IdentityRef;

/// Enablement state of a named identity trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerDefinition {
    pub enabled: bool,
    pub inactive: bool,
}

impl TriggerDefinition {
    pub fn new(enabled: bool, inactive: bool) -> Self {
        Self { enabled, inactive }
    }

    /// A trigger fires only when enabled and not marked inactive.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.inactive
    }
}

/// A named population filter, opaque to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationFilter {
    pub name: String,
    pub filter: String,
}

impl PopulationFilter {
    pub fn new(name: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: filter.into(),
        }
    }
}

/// Lookup surface required by trigger evaluation.
///
/// Implementations must be safe to share between threads when evaluations run
/// concurrently for different identities.
pub trait TriggerStore: Send + Sync {
    /// Reads a nested boolean configuration value, e.g.
    /// `businessProcesses.joiner.enabled`. Missing paths read as false.
    fn get_boolean(&self, path: &str) -> Result<bool, StoreError>;

    /// Returns the root trigger-filter tree for a business process.
    fn match_filter(&self, process: &str) -> Result<Option<Value>, StoreError>;

    /// Resolves a trigger definition by name.
    fn trigger_definition(&self, name: &str) -> Result<Option<TriggerDefinition>, StoreError>;

    /// Resolves a population filter by name.
    fn population_filter(&self, name: &str) -> Result<Option<PopulationFilter>, StoreError>;

    /// Tests whether an identity belongs to a population.
    fn is_population_member(
        &self,
        identity: &IdentitySnapshot,
        filter: &PopulationFilter,
    ) -> Result<bool, StoreError>;

    /// Resolves an identity by id or name.
    fn find_identity(&self, id_or_name: &str) -> Result<Option<IdentityRef>, StoreError>;
}
