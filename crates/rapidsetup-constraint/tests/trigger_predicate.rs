//! End-to-end trigger decisions: guards, implicit checks, filters and precedence.

use rapidsetup_config::RapidSetupConfig;
use rapidsetup_constraint::{
    evaluate_trigger, DefaultImplicitCheck, ImplicitCheck, TriggerPredicate, JOINER, LEAVER,
    MOVER,
};
use rapidsetup_core::{EvaluationError, IdentitySnapshot, ProcessingState, TriggerDefinition};
use rapidsetup_test::filter::{and, attribute, static_leaf, trigger_filter};
use rapidsetup_test::store::{InMemoryStore, StoreCall};
use rapidsetup_test::{employee, service_account};
use serde_json::{json, Value};

fn department_changed() -> Value {
    trigger_filter(and(vec![attribute(
        "department",
        "Changed",
        "String",
        Value::Null,
    )]))
}

fn always(result: bool) -> Value {
    trigger_filter(and(vec![static_leaf(result)]))
}

/// A filter whose only item has no `type`; evaluating it is an error.
fn broken() -> Value {
    trigger_filter(json!({
        "type": "group",
        "booleanOperation": "AND",
        "items": [{"attributes": {}}]
    }))
}

fn transfer() -> (IdentitySnapshot, IdentitySnapshot) {
    let previous = employee("Alice").with("department", "Sales");
    let new = employee("Alice").with("department", "Finance");
    (new, previous)
}

fn evaluate(
    store: &InMemoryStore,
    process: &str,
    new: &mut IdentitySnapshot,
    previous: Option<&IdentitySnapshot>,
) -> bool {
    TriggerPredicate::new(store)
        .evaluate(process, Some(new), previous)
        .unwrap()
}

// ==================== Guards ====================

#[test]
fn test_blank_process_never_fires() {
    let store = InMemoryStore::new();
    let (mut new, previous) = transfer();
    assert!(!evaluate(&store, "", &mut new, Some(&previous)));
    assert!(!evaluate(&store, "  ", &mut new, Some(&previous)));
    assert!(store.calls().is_empty());
}

#[test]
fn test_disabled_process_never_fires() {
    let store = InMemoryStore::new().with_disabled_process(MOVER, Some(always(true)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert_eq!(store.filter_lookups(MOVER), 0);
}

#[test]
fn test_unconfigured_process_never_fires() {
    let store = InMemoryStore::new();
    let (mut new, previous) = transfer();
    assert!(!evaluate(&store, "reinstate", &mut new, Some(&previous)));
}

#[test]
fn test_missing_new_identity_never_fires() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));
    let result = TriggerPredicate::new(&store).evaluate(JOINER, None, None).unwrap();
    assert!(!result);
    assert_eq!(store.filter_lookups(JOINER), 0);
}

#[test]
fn test_non_human_identities_never_fire() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));

    let mut service = service_account("svc-backup");
    assert!(!evaluate(&store, JOINER, &mut service, None));

    let mut robot = employee("Robo").with("type", "RPA");
    assert!(!evaluate(&store, JOINER, &mut robot, None));
    assert_eq!(store.filter_lookups(JOINER), 0);
}

// ==================== Filters ====================

#[test]
fn test_filter_decides() {
    let store = InMemoryStore::new().with_process(MOVER, Some(department_changed()));

    let (mut new, previous) = transfer();
    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));

    let mut same = previous.clone();
    assert!(!evaluate(&store, MOVER, &mut same, Some(&previous)));
}

#[test]
fn test_unconfigured_filter_does_not_fire_on_continue() {
    let (mut new, previous) = transfer();

    let store = InMemoryStore::new().with_process(MOVER, None);
    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));

    let store = InMemoryStore::new().with_process(MOVER, Some(json!({"other": true})));
    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));

    let store = InMemoryStore::new().with_process(MOVER, Some(trigger_filter(and(vec![]))));
    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
}

#[test]
fn test_unconfigured_filter_fires_on_continue_opt() {
    let store = InMemoryStore::new().with_process(JOINER, None);
    let mut new = employee("Alice");

    assert!(evaluate(&store, JOINER, &mut new, None));
    assert_eq!(new.processing_state(), None);
}

#[test]
fn test_filter_configuration_error_propagates() {
    let store = InMemoryStore::new().with_process(MOVER, Some(broken()));
    let (mut new, previous) = transfer();

    let err = TriggerPredicate::new(&store)
        .evaluate(MOVER, Some(&mut new), Some(&previous))
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_filter_lookup_error_is_wrapped() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(always(true)))
        .fail_on(MOVER);
    let (mut new, previous) = transfer();

    let err = TriggerPredicate::new(&store)
        .evaluate(MOVER, Some(&mut new), Some(&previous))
        .unwrap_err();
    match err {
        EvaluationError::Lookup { what, .. } => assert!(what.contains("mover")),
        other => panic!("expected lookup error, got {}", other),
    }
}

#[test]
fn test_nesting_limit_is_configurable() {
    let deep = trigger_filter(and(vec![and(vec![and(vec![static_leaf(true)])])]));
    let store = InMemoryStore::new().with_process(MOVER, Some(deep));
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
    let err = TriggerPredicate::new(&store)
        .with_max_depth(1)
        .evaluate(MOVER, Some(&mut new), Some(&previous))
        .unwrap_err();
    assert!(err.is_configuration());
}

// ==================== Implicit checks ====================

#[test]
fn test_needs_processing_performs_without_filter() {
    let store = InMemoryStore::new().with_process(JOINER, Some(broken()));
    let mut new = employee("Alice").with("rapidSetupProcessingState", "needsProcessing");

    assert!(evaluate(&store, JOINER, &mut new, None));
    assert_eq!(store.filter_lookups(JOINER), 0);
}

#[test]
fn test_processed_identity_is_cancelled() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));
    let mut new = employee("Alice").with("rapidSetupProcessingState", "processed");

    assert!(!evaluate(&store, JOINER, &mut new, None));
    assert_eq!(store.filter_lookups(JOINER), 0);
    assert_eq!(new.processing_state(), Some(ProcessingState::Processed));
}

#[test]
fn test_skipped_identity_honours_reprocess_setting() {
    let skipped = || employee("Alice").with("rapidSetupProcessingState", "skipped");

    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));
    assert!(!evaluate(&store, JOINER, &mut skipped(), None));

    let store = InMemoryStore::new()
        .with_process(JOINER, Some(always(true)))
        .with_reprocess_skipped(JOINER);
    assert!(evaluate(&store, JOINER, &mut skipped(), None));
}

#[test]
fn test_inactive_new_identity_is_marked_skipped() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));
    let mut new = employee("Alice").with("inactive", true);

    assert!(!evaluate(&store, JOINER, &mut new, None));
    assert_eq!(new.processing_state(), Some(ProcessingState::Skipped));
    assert_eq!(store.filter_lookups(JOINER), 0);
}

#[test]
fn test_inactive_flag_stored_as_text() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(true)));
    let mut new = employee("Alice").with("inactive", "true");

    assert!(!evaluate(&store, JOINER, &mut new, None));
    assert_eq!(new.processing_state(), Some(ProcessingState::Skipped));
}

#[test]
fn test_mover_and_leaver_need_previous_identity() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(always(true)))
        .with_process(LEAVER, Some(always(true)));

    let mut new = employee("Alice");
    assert!(!evaluate(&store, MOVER, &mut new, None));
    assert!(!evaluate(&store, LEAVER, &mut new, None));
    assert_eq!(store.filter_lookups(MOVER), 0);
}

#[test]
fn test_custom_implicit_checks() {
    fn default_only(_process: &str) -> Box<dyn ImplicitCheck> {
        Box::new(DefaultImplicitCheck)
    }

    let store = InMemoryStore::new().with_process(JOINER, None);
    let mut new = employee("Alice");

    // The built-in joiner check would opt in for a new identity
    let result = TriggerPredicate::new(&store)
        .with_implicit_checks(default_only)
        .evaluate(JOINER, Some(&mut new), None)
        .unwrap();
    assert!(!result);
}

// ==================== Skip marking ====================

#[test]
fn test_joiner_filter_false_marks_skipped() {
    let store = InMemoryStore::new().with_process(JOINER, Some(always(false)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, JOINER, &mut new, Some(&previous)));
    assert_eq!(new.processing_state(), Some(ProcessingState::Skipped));
}

#[test]
fn test_other_processes_do_not_mark() {
    let store = InMemoryStore::new().with_process(MOVER, Some(always(false)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert_eq!(new.processing_state(), None);
}

#[test]
fn test_no_mark_when_filter_is_unconfigured_or_fails() {
    let (mut new, previous) = transfer();

    let store = InMemoryStore::new().with_process(JOINER, None);
    assert!(!evaluate(&store, JOINER, &mut new, Some(&previous)));
    assert_eq!(new.processing_state(), None);

    let store = InMemoryStore::new().with_process(JOINER, Some(broken()));
    assert!(TriggerPredicate::new(&store)
        .evaluate(JOINER, Some(&mut new), Some(&previous))
        .is_err());
    assert_eq!(new.processing_state(), None);
}

// ==================== Precedence ====================

#[test]
fn test_mover_fires_alone() {
    let store = InMemoryStore::new().with_process(MOVER, Some(department_changed()));
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
}

#[test]
fn test_mover_suppressed_by_leaver() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(LEAVER, Some(always(true)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert!(evaluate(&store, LEAVER, &mut new, Some(&previous)));
}

#[test]
fn test_mover_suppressed_by_joiner() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(JOINER, Some(department_changed()));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
}

#[test]
fn test_mover_fires_when_higher_processes_decline() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(LEAVER, Some(always(false)));
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
}

#[test]
fn test_inactive_trigger_is_not_rechecked() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(LEAVER, Some(always(true)))
        .with_trigger(LEAVER, TriggerDefinition::new(true, true));
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert_eq!(store.filter_lookups(LEAVER), 0);
}

#[test]
fn test_missing_trigger_is_not_rechecked() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(LEAVER, Some(always(true)))
        .without_trigger(LEAVER);
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
}

#[test]
fn test_precedence_checked_highest_first() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(LEAVER, Some(always(true)))
        .with_process(JOINER, Some(always(true)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
    // Leaver suppressed the mover, so the joiner was never consulted
    assert_eq!(store.filter_lookups(LEAVER), 1);
    assert_eq!(store.filter_lookups(JOINER), 0);
    assert!(store.calls().contains(&StoreCall::TriggerDefinition(
        "RapidSetup Leaver".to_string()
    )));
}

#[test]
fn test_precedence_not_checked_when_process_declines() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(always(false)))
        .with_process(LEAVER, Some(always(true)));
    let (mut new, previous) = transfer();

    assert!(!evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert_eq!(store.filter_lookups(LEAVER), 0);
}

#[test]
fn test_joiner_recheck_may_mark_skipped() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .with_process(JOINER, Some(always(false)));
    let (mut new, previous) = transfer();

    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));
    assert_eq!(new.processing_state(), Some(ProcessingState::Skipped));
}

#[test]
fn test_trigger_lookup_error_is_wrapped() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(department_changed()))
        .fail_on("RapidSetup Leaver");
    let (mut new, previous) = transfer();

    let err = TriggerPredicate::new(&store)
        .evaluate(MOVER, Some(&mut new), Some(&previous))
        .unwrap_err();
    assert!(matches!(err, EvaluationError::Lookup { .. }));
}

// ==================== Configuration files ====================

#[test]
fn test_yaml_configured_processes() {
    let config = RapidSetupConfig::from_yaml_str(
        r#"
businessProcesses:
  joiner:
    enabled: true
  mover:
    enabled: true
    triggerFilter:
      group:
        type: group
        booleanOperation: OR
        items:
          - type: Attribute
            attributes:
              attributeValue:
                property: department
                operator: ChangedTo
                dataType: String
                value: finance
"#,
    )
    .unwrap();
    let store = InMemoryStore::with_config(config)
        .with_trigger(MOVER, TriggerDefinition::new(true, false))
        .with_trigger(JOINER, TriggerDefinition::new(true, false));
    let (mut new, previous) = transfer();

    // Joiner has no filter and the identity existed before: no opt-in
    assert!(evaluate(&store, MOVER, &mut new, Some(&previous)));

    let mut hire = employee("Bob");
    assert!(evaluate_trigger(JOINER, &store, Some(&mut hire), None).unwrap());
}
