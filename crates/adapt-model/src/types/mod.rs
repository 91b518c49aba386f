use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub Uuid);

impl PhaseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(pub Uuid);

impl RuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of phase kinds an adaptive definition can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Access,
    Info,
    Training,
    Questionnaire,
}

/// A task inside a training phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub order: u32,
    pub title: String,
}

/// Threshold predicate of a decision rule.
///
/// A rule matches a performance sample when every *present* threshold
/// is satisfied: numeric values at or below the bound, boolean flags
/// equal. A rule with no thresholds at all is the unconditional
/// fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConditions {
    pub max_wrong_answers: Option<u32>,
    pub max_commands_entered: Option<u32>,
    pub max_completion_time_secs: Option<u64>,
    pub solution_displayed: Option<bool>,
    pub questionnaire_answered: Option<bool>,
}

impl RuleConditions {
    pub fn is_unconditional(&self) -> bool {
        self.max_wrong_answers.is_none()
            && self.max_commands_entered.is_none()
            && self.max_completion_time_secs.is_none()
            && self.solution_displayed.is_none()
            && self.questionnaire_answered.is_none()
    }
}

/// One conditional edge out of a training phase.
///
/// `priority` must equal the rule's position in the decision matrix;
/// declaration order IS evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRule {
    pub id: RuleId,
    pub priority: u32,
    pub target_phase_id: PhaseId,
    #[serde(default)]
    pub conditions: RuleConditions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPhase {
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub decision_matrix: Vec<DecisionRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    MultipleChoice,
    FreeForm,
    Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
}

/// One conditional edge out of a questionnaire phase.
///
/// The rule fires when the success rate over `evaluated_question_ids`
/// reaches `required_success_rate`. Rates need not be monotonic across
/// rules; evaluation order is declaration order, never threshold
/// magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRule {
    pub id: RuleId,
    pub priority: u32,
    pub target_phase_id: PhaseId,
    /// Required percentage of evaluated questions answered correctly,
    /// 0-100 inclusive.
    pub required_success_rate: u8,
    pub evaluated_question_ids: Vec<QuestionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnairePhase {
    pub questions: Vec<Question>,
    pub branch_rules: Vec<BranchRule>,
}

/// Kind-specific payload of a phase.
///
/// Modelled as a closed sum type so evaluator selection is an
/// exhaustive match; adding a phase kind is a compile error until
/// every consumer handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PhaseBody {
    Access,
    Info,
    Training(TrainingPhase),
    Questionnaire(QuestionnairePhase),
}

impl PhaseBody {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PhaseBody::Access => PhaseKind::Access,
            PhaseBody::Info => PhaseKind::Info,
            PhaseBody::Training(_) => PhaseKind::Training,
            PhaseBody::Questionnaire(_) => PhaseKind::Questionnaire,
        }
    }
}

/// A node in the adaptive graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: PhaseId,
    /// Designer-assigned position; need not be contiguous, but must be
    /// unique across the definition.
    pub order: u32,
    pub title: String,
    /// Trainees may legitimately finish on this phase.
    #[serde(default)]
    pub is_end: bool,
    #[serde(flatten)]
    pub body: PhaseBody,
}

impl Phase {
    pub fn new(order: u32, title: impl Into<String>, body: PhaseBody) -> Self {
        Self {
            id: PhaseId::new(),
            order,
            title: title.into(),
            is_end: false,
            body,
        }
    }

    /// Flag this phase as a valid endpoint of the traversal.
    #[must_use]
    pub fn end_phase(mut self) -> Self {
        self.is_end = true;
        self
    }

    pub fn kind(&self) -> PhaseKind {
        self.body.kind()
    }
}

/// An explicitly declared edge between two phases, as produced by the
/// definition editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRelation {
    pub from: PhaseId,
    pub to: PhaseId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_conditions_are_unconditional() {
        assert!(RuleConditions::default().is_unconditional());

        let conditioned = RuleConditions {
            max_wrong_answers: Some(0),
            ..RuleConditions::default()
        };
        assert!(!conditioned.is_unconditional());
    }

    #[test]
    fn phase_kind_follows_body() {
        let phase = Phase::new(0, "intro", PhaseBody::Info);
        assert_eq!(phase.kind(), PhaseKind::Info);
        assert!(!phase.is_end);
        assert!(phase.end_phase().is_end);
    }
}
