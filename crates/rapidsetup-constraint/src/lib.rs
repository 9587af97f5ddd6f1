//! Trigger-constraint evaluation for RapidSetup business processes.
//!
//! Decides, for a changing identity, whether a lifecycle business process
//! (joiner, mover, leaver) should fire. A configured boolean expression tree of
//! typed attribute comparisons is evaluated against the previous and new
//! identity snapshots, after process-specific implicit checks and before
//! precedence between processes is enforced.
//!
//! # Example
//!
//! ```
//! use rapidsetup_constraint::ConstraintNode;
//! use serde_json::json;
//!
//! let node = ConstraintNode::parse(&json!({
//!     "type": "group",
//!     "booleanOperation": "OR",
//!     "items": [
//!         {"type": "Static", "attributes": {"value": false}},
//!         {"type": "Static", "attributes": {"value": true}}
//!     ]
//! })).unwrap();
//!
//! assert_eq!(node.label(), "group(OR)");
//! ```

mod attribute_value;
mod context;
pub mod evaluator;
mod implicit;
mod node;
mod precedence;
mod predicate;
pub mod util;

pub use attribute_value::{AttributeValueDto, DataType, Operator, ATTRIBUTE_VALUE};
pub use context::ConstraintContext;
pub use evaluator::{
    attribute_evaluator, evaluator_for, java_pattern_to_chrono, ConstraintEvaluator, EvaluatorKind,
};
pub use implicit::{
    DefaultImplicitCheck, ExistingIdentityImplicitCheck, ImplicitCheck, ImplicitCheckFactory,
    ImplicitCheckInput, JoinerImplicitCheck, Shortcut,
};
pub use node::{
    BooleanOperation, ConstraintNode, ConstraintType, PopulationConstraint, PopulationOperator,
    DEFAULT_MAX_DEPTH,
};
pub use precedence::{TriggerPrecedence, JOINER, LEAVER, MOVER};
pub use predicate::{evaluate_trigger, ImplicitCheckSource, TriggerPredicate};
