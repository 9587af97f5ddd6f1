//! Batch runs over identity transitions.

use rapidsetup::{ProcessingState, Transition, TriggerRunner, JOINER, MOVER};
use rapidsetup_test::filter::{and, attribute, static_leaf, trigger_filter};
use rapidsetup_test::{employee, service_account, InMemoryStore};
use serde_json::{json, Value};

fn hires() -> Vec<Transition> {
    vec![
        Transition::created(employee("Alice").with("department", "Finance")),
        Transition::created(employee("Bob").with("department", "Sales")),
        Transition::created(service_account("svc-batch")),
    ]
}

#[test]
fn test_matches_are_collected() {
    let store = InMemoryStore::new().with_process(
        JOINER,
        Some(trigger_filter(and(vec![attribute(
            "department",
            "Equals",
            "String",
            "finance",
        )]))),
    );
    let mut transitions = hires();

    let summary = TriggerRunner::new(&store).run(JOINER, &mut transitions);

    assert_eq!(summary.matched, vec!["id-alice"]);
    // A joiner filter that declines marks the identity skipped
    assert_eq!(summary.skipped, vec!["id-bob"]);
    assert!(summary.is_clean());
}

#[test]
fn test_skip_marks_are_reported_and_kept() {
    let store = InMemoryStore::new()
        .with_process(JOINER, Some(trigger_filter(and(vec![static_leaf(false)]))));
    let mut transitions = vec![
        Transition::updated(employee("Alice"), employee("Alice").with("title", "Analyst")),
        Transition::created(employee("Bob").with("inactive", true)),
    ];

    let summary = TriggerRunner::new(&store).run(JOINER, &mut transitions);

    assert!(summary.matched.is_empty());
    assert_eq!(summary.skipped, vec!["id-alice", "id-bob"]);
    for transition in &transitions {
        assert_eq!(
            transition.new_identity.processing_state(),
            Some(ProcessingState::Skipped)
        );
    }
}

#[test]
fn test_already_skipped_is_not_reported_again() {
    let store = InMemoryStore::new().with_process(JOINER, None);
    let mut transitions = vec![Transition::created(
        employee("Alice").with("rapidSetupProcessingState", "skipped"),
    )];

    let summary = TriggerRunner::new(&store).run(JOINER, &mut transitions);

    assert!(summary.matched.is_empty());
    assert!(summary.skipped.is_empty());
}

#[test]
fn test_failures_do_not_abort_the_batch() {
    let broken: Value = trigger_filter(json!({
        "type": "group",
        "booleanOperation": "OR",
        "items": [
            {"type": "Attribute", "attributes": {"attributeValue": {"property": "department"}}},
        ]
    }));
    let store = InMemoryStore::new().with_process(MOVER, Some(broken));
    let mut transitions = vec![
        Transition::updated(employee("Alice"), employee("Alice")),
        Transition::created(employee("Bob")),
    ];

    let summary = TriggerRunner::new(&store).run(MOVER, &mut transitions);

    assert!(summary.matched.is_empty());
    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(failure.identity, "id-alice");
    assert!(failure.configuration);
    assert!(failure.message.contains("'department'"));
}

#[test]
fn test_store_failures_are_recorded() {
    let store = InMemoryStore::new()
        .with_process(MOVER, Some(trigger_filter(and(vec![static_leaf(true)]))))
        .fail_on(MOVER);
    let mut transitions = vec![
        Transition::updated(employee("Alice"), employee("Alice")),
        Transition::updated(employee("Bob"), employee("Bob")),
    ];

    let summary = TriggerRunner::new(&store).run(MOVER, &mut transitions);

    assert_eq!(summary.failures.len(), 2);
    assert!(summary.failures.iter().all(|f| !f.configuration));
}
