//! Repeated runs over identical snapshots must agree exactly.

use adapt_model::{
    BranchRule, DecisionRule, Phase, PhaseBody, PhaseGraph, PhaseId, Question, QuestionId,
    QuestionKind, QuestionnairePhase, RuleConditions, RuleId, TrainingPhase,
};
use adapt_sim::{PathSimulator, PerformanceProfile, PhaseSample};
use proptest::prelude::*;

/// Training(0) branches to Questionnaire(1) on wrongAnswers <= 1,
/// otherwise falls back to Info(2, end). The questionnaire loops back
/// to training on a perfect score and is itself an end phase, so the
/// fixture can complete, stall-free remediate, or loop-abort depending
/// on the profile.
fn remediation_graph() -> (PhaseGraph, PhaseId, PhaseId, [QuestionId; 2]) {
    let questions = [
        Question {
            id: QuestionId::new(),
            kind: QuestionKind::MultipleChoice,
        },
        Question {
            id: QuestionId::new(),
            kind: QuestionKind::FreeForm,
        },
    ];
    let training_id = PhaseId::new();
    let info = Phase::new(2, "debrief", PhaseBody::Info).end_phase();

    let questionnaire = Phase::new(
        1,
        "checkpoint",
        PhaseBody::Questionnaire(QuestionnairePhase {
            questions: questions.to_vec(),
            branch_rules: vec![BranchRule {
                id: RuleId::new(),
                priority: 0,
                target_phase_id: training_id,
                required_success_rate: 100,
                evaluated_question_ids: vec![questions[0].id, questions[1].id],
            }],
        }),
    )
    .end_phase();

    let mut training = Phase::new(
        0,
        "drill",
        PhaseBody::Training(TrainingPhase {
            tasks: vec![],
            decision_matrix: vec![
                DecisionRule {
                    id: RuleId::new(),
                    priority: 0,
                    target_phase_id: questionnaire.id,
                    conditions: RuleConditions {
                        max_wrong_answers: Some(1),
                        ..RuleConditions::default()
                    },
                },
                DecisionRule {
                    id: RuleId::new(),
                    priority: 1,
                    target_phase_id: info.id,
                    conditions: RuleConditions::default(),
                },
            ],
        }),
    );
    training.id = training_id;

    let questionnaire_id = questionnaire.id;
    let question_ids = [questions[0].id, questions[1].id];
    let graph = PhaseGraph::build(vec![training, questionnaire, info], vec![])
        .expect("fixture should validate");
    (graph, training_id, questionnaire_id, question_ids)
}

proptest! {
    #[test]
    fn repeated_runs_produce_identical_outcomes(
        wrong_answers in 0u32..6,
        first_correct: bool,
        second_correct: bool,
    ) {
        let (graph, training_id, questionnaire_id, question_ids) = remediation_graph();

        let mut profile = PerformanceProfile::new();
        profile.set_sample(
            training_id,
            PhaseSample {
                wrong_answers,
                ..PhaseSample::default()
            },
        );
        profile.set_sample(
            questionnaire_id,
            PhaseSample {
                answers: [
                    (question_ids[0], first_correct),
                    (question_ids[1], second_correct),
                ]
                .into_iter()
                .collect(),
                ..PhaseSample::default()
            },
        );

        let simulator = PathSimulator::default();
        let first = simulator.run(&graph, &profile);
        let second = simulator.run(&graph, &profile);

        prop_assert!(!first.path().is_empty());
        prop_assert_eq!(first, second);
    }
}
