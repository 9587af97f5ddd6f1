//! Tests for attribute values and identity snapshots.

use serde_json::json;

use crate::identity::{IdentitySnapshot, ProcessingState};
use crate::store::TriggerDefinition;
use crate::value::{AttributeValue, IdentityRef};

#[test]
fn test_json_conversion() {
    assert_eq!(AttributeValue::from(json!(null)), AttributeValue::Null);
    assert_eq!(AttributeValue::from(json!(true)), AttributeValue::Bool(true));
    assert_eq!(AttributeValue::from(json!(42)), AttributeValue::Int(42));
    assert_eq!(AttributeValue::from(json!(1.5)), AttributeValue::Float(1.5));
    assert_eq!(
        AttributeValue::from(json!("Engineering")),
        AttributeValue::String("Engineering".into())
    );
    assert_eq!(
        AttributeValue::from(json!({"id": "2c90", "name": "Amy.Cox"})),
        AttributeValue::Identity(IdentityRef::new("2c90", "Amy.Cox"))
    );
}

#[test]
fn test_list_equality_ignores_order() {
    let a = AttributeValue::from(json!(["a", "b"]));
    let b = AttributeValue::from(json!(["b", "a"]));
    let c = AttributeValue::from(json!(["a", "c"]));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_mixed_numeric_equality() {
    assert_eq!(AttributeValue::Int(3), AttributeValue::Float(3.0));
    assert_ne!(AttributeValue::Int(3), AttributeValue::String("3".into()));
}

#[test]
fn test_normalized_treats_empty_as_null() {
    assert!(AttributeValue::String(String::new()).normalized().is_null());
    assert!(AttributeValue::List(Vec::new()).normalized().is_null());
    assert!(!AttributeValue::String("x".into()).normalized().is_null());
}

#[test]
fn test_identity_refs_compare_by_id() {
    let a = AttributeValue::Identity(IdentityRef::new("1", "Amy.Cox"));
    let b = AttributeValue::Identity(IdentityRef::new("1", "amy.cox"));
    assert_eq!(a, b);
}

#[test]
fn test_snapshot_intrinsic_properties() {
    let identity = IdentitySnapshot::new("42", "Alan.Bradley").with("department", "Finance");
    assert_eq!(identity.get("id"), AttributeValue::String("42".into()));
    assert_eq!(identity.get("name"), AttributeValue::String("Alan.Bradley".into()));
    assert_eq!(identity.get("department"), AttributeValue::String("Finance".into()));
    assert!(identity.get("location").is_null());
}

#[test]
fn test_snapshot_human_discriminator() {
    assert!(IdentitySnapshot::new("1", "a").is_human());
    assert!(IdentitySnapshot::new("1", "a").with("type", "employee").is_human());
    assert!(!IdentitySnapshot::new("1", "a").with("type", "Service").is_human());
    assert!(!IdentitySnapshot::new("1", "a").with("type", "RPA").is_human());
}

#[test]
fn test_processing_state_round_trip() {
    let mut identity = IdentitySnapshot::new("1", "a");
    assert_eq!(identity.processing_state(), None);
    identity.set_processing_state(ProcessingState::Skipped);
    assert_eq!(identity.processing_state(), Some(ProcessingState::Skipped));
    assert_eq!(
        identity.get("rapidSetupProcessingState"),
        AttributeValue::String("skipped".into())
    );
}

#[test]
fn test_trigger_definition_activity() {
    assert!(TriggerDefinition::new(true, false).is_active());
    assert!(!TriggerDefinition::new(true, true).is_active());
    assert!(!TriggerDefinition::new(false, false).is_active());
}

#[test]
fn test_truthiness() {
    assert!(AttributeValue::from("Yes").is_truthy());
    assert!(AttributeValue::from(" on ").is_truthy());
    assert!(AttributeValue::Int(2).is_truthy());
    assert!(!AttributeValue::from("no").is_truthy());
    assert!(!AttributeValue::Float(0.0).is_truthy());
    assert!(!AttributeValue::Null.is_truthy());
}

#[test]
fn test_inactive_flag_accepts_text() {
    assert!(IdentitySnapshot::new("1", "a").with("inactive", true).is_inactive());
    assert!(IdentitySnapshot::new("1", "a").with("inactive", "true").is_inactive());
    assert!(!IdentitySnapshot::new("1", "a").with("inactive", "false").is_inactive());
    assert!(!IdentitySnapshot::new("1", "a").is_inactive());
}
