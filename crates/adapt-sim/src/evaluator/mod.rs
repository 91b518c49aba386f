//! Branch rule evaluators, one per phase kind.
//!
//! Each evaluator is a pure function from (phase, sample) to the
//! chosen outgoing edge. [`Decision::NoMatch`] is a normal outcome,
//! not an error; the simulator decides whether it ends or stalls the
//! run. These evaluators must reproduce the remote evaluator's
//! decision semantics bit for bit, so all arithmetic is integral.

use crate::profile::PhaseSample;
use adapt_model::{
    BranchRule, Phase, PhaseBody, PhaseGraph, PhaseId, QuestionnairePhase, RuleConditions,
    TrainingPhase,
};

/// Outcome of evaluating a single phase against a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Route to this phase next.
    Target(PhaseId),
    /// No rule matched. A valid endpoint on an end phase, a stall
    /// anywhere else.
    NoMatch,
}

/// Evaluator selection, exhaustive over the closed set of phase kinds.
pub fn evaluate(graph: &PhaseGraph, phase: &Phase, sample: &PhaseSample) -> Decision {
    match &phase.body {
        PhaseBody::Access | PhaseBody::Info => evaluate_linear(graph, phase),
        PhaseBody::Training(training) => evaluate_training(training, sample),
        PhaseBody::Questionnaire(questionnaire) => evaluate_questionnaire(questionnaire, sample),
    }
}

/// Access and info phases make no decision: they route to the next
/// phase by designer order, and a terminal one simply has no target.
fn evaluate_linear(graph: &PhaseGraph, phase: &Phase) -> Decision {
    match graph.successor_by_order(phase.id) {
        Some(next) => Decision::Target(next.id),
        None => Decision::NoMatch,
    }
}

/// First rule in declaration order whose thresholds all hold wins.
fn evaluate_training(phase: &TrainingPhase, sample: &PhaseSample) -> Decision {
    for rule in &phase.decision_matrix {
        if conditions_hold(&rule.conditions, sample) {
            return Decision::Target(rule.target_phase_id);
        }
    }
    Decision::NoMatch
}

/// Every present threshold must be satisfied; an empty condition set
/// always matches (the fallback rule).
fn conditions_hold(conditions: &RuleConditions, sample: &PhaseSample) -> bool {
    if let Some(max) = conditions.max_wrong_answers {
        if sample.wrong_answers > max {
            return false;
        }
    }
    if let Some(max) = conditions.max_commands_entered {
        if sample.commands_entered > max {
            return false;
        }
    }
    if let Some(max) = conditions.max_completion_time_secs {
        if sample.completion_time_secs > max {
            return false;
        }
    }
    if let Some(required) = conditions.solution_displayed {
        if sample.solution_displayed != required {
            return false;
        }
    }
    if let Some(required) = conditions.questionnaire_answered {
        if sample.questionnaire_answered != required {
            return false;
        }
    }
    true
}

/// First rule in declaration order whose required success rate is met
/// wins. Declaration order is priority: rates are never re-sorted.
fn evaluate_questionnaire(phase: &QuestionnairePhase, sample: &PhaseSample) -> Decision {
    for rule in &phase.branch_rules {
        if u32::from(rule.required_success_rate) <= success_rate(rule, sample) {
            return Decision::Target(rule.target_phase_id);
        }
    }
    Decision::NoMatch
}

/// Integer percentage of evaluated questions answered correctly,
/// truncated toward zero so comparisons are reproducible across
/// implementations (1 of 3 correct is 33, never 34).
pub fn success_rate(rule: &BranchRule, sample: &PhaseSample) -> u32 {
    let total = rule.evaluated_question_ids.len() as u32;
    if total == 0 {
        // Empty selections are rejected at build time.
        return 0;
    }
    let correct = rule
        .evaluated_question_ids
        .iter()
        .filter(|question| sample.is_correct(**question))
        .count() as u32;
    correct * 100 / total
}
