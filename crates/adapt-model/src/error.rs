//! Structural errors for adaptive definitions.
//!
//! Everything here is detected at graph-build time and surfaced to the
//! designer as a definition-validation failure. The simulator never
//! runs against a definition that produced one of these.

use crate::types::{PhaseId, QuestionId, RuleId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The definition contains no phases at all.
    #[error("definition contains no phases")]
    EmptyDefinition,

    /// Two phases share the same id.
    #[error("duplicate phase id {0}")]
    DuplicatePhaseId(PhaseId),

    /// Two phases share the same designer-assigned order.
    #[error("phases {first} and {second} share order {order}")]
    DuplicateOrder {
        order: u32,
        first: PhaseId,
        second: PhaseId,
    },

    /// A decision or branch rule targets a phase that does not exist.
    #[error("rule {rule} targets unknown phase {target}")]
    DanglingTarget { rule: RuleId, target: PhaseId },

    /// A declared relation references a phase that does not exist.
    #[error("relation references unknown phase {0}")]
    DanglingRelation(PhaseId),

    /// A training or questionnaire phase declares no rules.
    #[error("phase {0} declares no branching rules")]
    EmptyRuleSet(PhaseId),

    /// An unconditional fallback rule appears anywhere but last.
    #[error("phase {phase} has fallback rule {rule} before the end of its rule list")]
    MisplacedFallback { phase: PhaseId, rule: RuleId },

    /// A rule's stored priority disagrees with its list position.
    #[error("rule {rule} has priority {found}, expected {expected} from declaration order")]
    PriorityMismatch {
        rule: RuleId,
        expected: u32,
        found: u32,
    },

    /// A branch rule evaluates an empty question selection.
    #[error("rule {rule} evaluates no questions")]
    EmptyQuestionSelection { rule: RuleId },

    /// A branch rule references a question its phase does not declare.
    #[error("rule {rule} references unknown question {question}")]
    UnknownQuestion { rule: RuleId, question: QuestionId },

    /// A required success rate outside 0-100.
    #[error("rule {rule} requires success rate {value}, valid range is 0-100")]
    SuccessRateOutOfRange { rule: RuleId, value: u8 },
}
