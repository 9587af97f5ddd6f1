//! RapidSetup Core - Core types and traits for trigger evaluation
//!
//! This crate provides the fundamental abstractions for RapidSetup:
//! - Attribute values and identity snapshots
//! - The persistence collaborator trait consulted during evaluation
//! - Error types shared by the evaluation crates

pub mod error;
pub mod identity;
pub mod store;
pub mod value;

#[cfg(test)]
mod value_tests;

pub use error::{EvaluationError, Result, StoreError};
pub use identity::{
    IdentitySnapshot, ProcessingState, ATT_INACTIVE, ATT_PROCESSING_STATE, ATT_TYPE,
};
pub use store::{PopulationFilter, TriggerDefinition, TriggerStore};
pub use value::{AttributeValue, IdentityRef};
