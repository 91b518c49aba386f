//! Deserializing an editor payload into a buildable definition.
//!
//! The definition editor ships phases as camelCase JSON with a `kind`
//! tag per phase; this is the shape the model must accept.

use adapt_model::{Phase, PhaseGraph, PhaseKind};

const DEFINITION: &str = r#"
[
  {
    "id": "7f1c1af1-5c0a-4d0e-9f6e-000000000001",
    "order": 0,
    "title": "Get access",
    "kind": "access"
  },
  {
    "id": "7f1c1af1-5c0a-4d0e-9f6e-000000000002",
    "order": 1,
    "title": "Privilege escalation",
    "kind": "training",
    "tasks": [
      { "id": 11, "order": 0, "title": "Scan the host" },
      { "id": 12, "order": 1, "title": "Exploit the service" }
    ],
    "decisionMatrix": [
      {
        "id": "9a2b3c4d-0000-4000-8000-000000000001",
        "priority": 0,
        "targetPhaseId": "7f1c1af1-5c0a-4d0e-9f6e-000000000003",
        "conditions": { "maxWrongAnswers": 1, "solutionDisplayed": false }
      },
      {
        "id": "9a2b3c4d-0000-4000-8000-000000000002",
        "priority": 1,
        "targetPhaseId": "7f1c1af1-5c0a-4d0e-9f6e-000000000003"
      }
    ]
  },
  {
    "id": "7f1c1af1-5c0a-4d0e-9f6e-000000000003",
    "order": 2,
    "title": "Exit questionnaire",
    "kind": "questionnaire",
    "isEnd": true,
    "questions": [
      { "id": "5e6f7a8b-0000-4000-8000-000000000001", "kind": "multipleChoice" },
      { "id": "5e6f7a8b-0000-4000-8000-000000000002", "kind": "freeForm" }
    ],
    "branchRules": [
      {
        "id": "9a2b3c4d-0000-4000-8000-000000000003",
        "priority": 0,
        "targetPhaseId": "7f1c1af1-5c0a-4d0e-9f6e-000000000002",
        "requiredSuccessRate": 50,
        "evaluatedQuestionIds": [
          "5e6f7a8b-0000-4000-8000-000000000001",
          "5e6f7a8b-0000-4000-8000-000000000002"
        ]
      }
    ]
  }
]
"#;

#[test]
fn editor_payload_builds() {
    let phases: Vec<Phase> = serde_json::from_str(DEFINITION).expect("payload should parse");
    assert_eq!(phases.len(), 3);
    assert_eq!(phases[0].kind(), PhaseKind::Access);
    assert_eq!(phases[1].kind(), PhaseKind::Training);
    assert_eq!(phases[2].kind(), PhaseKind::Questionnaire);
    assert!(phases[2].is_end);

    let graph = PhaseGraph::build(phases, vec![]).expect("definition should validate");
    assert_eq!(graph.entry().title, "Get access");
    assert_eq!(graph.len(), 3);
    assert!(graph.unreachable_phases().is_empty());
}

#[test]
fn omitted_condition_fields_default_to_absent() {
    let phases: Vec<Phase> = serde_json::from_str(DEFINITION).expect("payload should parse");
    let adapt_model::PhaseBody::Training(training) = &phases[1].body else {
        panic!("expected training phase");
    };

    let first = &training.decision_matrix[0].conditions;
    assert_eq!(first.max_wrong_answers, Some(1));
    assert_eq!(first.solution_displayed, Some(false));
    assert_eq!(first.max_commands_entered, None);

    // Second rule carries no conditions block at all: the fallback.
    assert!(training.decision_matrix[1].conditions.is_unconditional());
}
