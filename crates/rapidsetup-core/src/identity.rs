//! Identity snapshots compared by trigger evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::AttributeValue;

/// Attribute holding the identity type discriminator.
pub const ATT_TYPE: &str = "type";

/// Attribute recording RapidSetup processing state.
pub const ATT_PROCESSING_STATE: &str = "rapidSetupProcessingState";

/// Attribute flagging an inactive identity.
pub const ATT_INACTIVE: &str = "inactive";

/// Values of [`ATT_PROCESSING_STATE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingState {
    /// Explicitly queued for joiner processing.
    NeedsProcessing,
    /// Joiner already ran for this identity.
    Processed,
    /// Joiner evaluated and declined this identity.
    Skipped,
}

impl ProcessingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingState::NeedsProcessing => "needsProcessing",
            ProcessingState::Processed => "processed",
            ProcessingState::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("needsProcessing") {
            Some(ProcessingState::NeedsProcessing)
        } else if s.eq_ignore_ascii_case("processed") {
            Some(ProcessingState::Processed)
        } else if s.eq_ignore_ascii_case("skipped") {
            Some(ProcessingState::Skipped)
        } else {
            None
        }
    }
}

/// Read-only (apart from processing state) view of an identity's attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl IdentitySnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets an attribute, builder style.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(property.into(), value.into());
    }

    /// Resolves a property path. `id` and `name` are intrinsic; everything else is
    /// read from the attribute bag, missing attributes reading as Null.
    pub fn get(&self, property: &str) -> AttributeValue {
        match property {
            "id" => AttributeValue::String(self.id.clone()),
            "name" => AttributeValue::String(self.name.clone()),
            _ => self
                .attributes
                .get(property)
                .cloned()
                .unwrap_or(AttributeValue::Null),
        }
    }

    /// Returns the `type` discriminator, if any.
    pub fn identity_type(&self) -> Option<&str> {
        self.attributes.get(ATT_TYPE).and_then(AttributeValue::as_str)
    }

    /// Service and RPA identities never take part in lifecycle processing.
    pub fn is_human(&self) -> bool {
        !matches!(
            self.identity_type(),
            Some(t) if t.eq_ignore_ascii_case("service") || t.eq_ignore_ascii_case("rpa")
        )
    }

    /// Reads the `inactive` flag under boolean truthiness, so `"true"` counts.
    pub fn is_inactive(&self) -> bool {
        self.attributes
            .get(ATT_INACTIVE)
            .is_some_and(AttributeValue::is_truthy)
    }

    pub fn processing_state(&self) -> Option<ProcessingState> {
        self.attributes
            .get(ATT_PROCESSING_STATE)
            .and_then(AttributeValue::as_str)
            .and_then(ProcessingState::parse)
    }

    pub fn set_processing_state(&mut self, state: ProcessingState) {
        self.set(ATT_PROCESSING_STATE, state.as_str());
    }
}
