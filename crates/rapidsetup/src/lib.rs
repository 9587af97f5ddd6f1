//! RapidSetup - Lifecycle trigger evaluation in Rust
//!
//! Decides whether Joiner, Mover or Leaver fires for an identity change, from
//! configured trigger filters, built-in implicit checks and process precedence.
//!
//! # Example
//!
//! ```rust
//! use rapidsetup::prelude::*;
//!
//! let config = RapidSetupConfig::from_toml_str(r#"
//!     [businessProcesses.joiner]
//!     enabled = true
//! "#).unwrap();
//!
//! assert!(config.get_boolean("businessProcesses.joiner.enabled").unwrap());
//! assert_eq!(TriggerPrecedence::ordered_check_first_list(JOINER), &[LEAVER]);
//! ```

// Core model
pub use rapidsetup_core::{
    AttributeValue, EvaluationError, IdentityRef, IdentitySnapshot, PopulationFilter,
    ProcessingState, Result, StoreError, TriggerDefinition, TriggerStore,
};

// Configuration
pub use rapidsetup_config::{BusinessProcessConfig, ConfigError, RapidSetupConfig};

// Engine
pub use rapidsetup_constraint::{
    evaluate_trigger, AttributeValueDto, ConstraintContext, ConstraintNode, ImplicitCheck,
    ImplicitCheckFactory, Shortcut, TriggerPrecedence, TriggerPredicate, JOINER, LEAVER, MOVER,
};

mod runner;
pub use runner::{RunFailure, RunSummary, Transition, TriggerRunner};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        evaluate_trigger, IdentitySnapshot, ProcessingState, RapidSetupConfig, TriggerPrecedence,
        TriggerPredicate, TriggerRunner, TriggerStore, JOINER, LEAVER, MOVER,
    };
    pub use super::{RunSummary, Transition};
}
