//! Validated phase graph.
//!
//! All structural validation happens here, at build time. Nothing is
//! re-validated while a simulation runs; holding a [`PhaseGraph`] is
//! proof that every check below has passed.

use crate::error::ValidationError;
use crate::types::{Phase, PhaseBody, PhaseId, PhaseRelation, QuestionnairePhase, TrainingPhase};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Immutable snapshot of an adaptive definition.
///
/// Only obtainable through [`PhaseGraph::build`]. The snapshot is used
/// unchanged for the remainder of one simulation; a new definition
/// means a new build.
#[derive(Debug, Clone)]
pub struct PhaseGraph {
    phases: HashMap<PhaseId, Phase>,
    /// Phase ids sorted by designer-assigned order.
    ordered: Vec<PhaseId>,
    /// Every declared edge: relations, rule targets, and the
    /// deterministic order-successor out of each non-terminal
    /// access/info phase.
    edges: DiGraphMap<PhaseId, ()>,
}

impl PhaseGraph {
    /// Validate a definition and freeze it into a graph snapshot.
    pub fn build(
        phases: Vec<Phase>,
        relations: Vec<PhaseRelation>,
    ) -> Result<Self, ValidationError> {
        if phases.is_empty() {
            return Err(ValidationError::EmptyDefinition);
        }

        // 1. Phase ids must be unique
        let mut map: HashMap<PhaseId, Phase> = HashMap::with_capacity(phases.len());
        for phase in phases {
            let id = phase.id;
            if map.insert(id, phase).is_some() {
                return Err(ValidationError::DuplicatePhaseId(id));
            }
        }

        // 2. Orders must be totally ordered (no ties)
        let mut ordered: Vec<PhaseId> = map.keys().copied().collect();
        ordered.sort_by_key(|id| map[id].order);
        for pair in ordered.windows(2) {
            let (first, second) = (&map[&pair[0]], &map[&pair[1]]);
            if first.order == second.order {
                return Err(ValidationError::DuplicateOrder {
                    order: first.order,
                    first: first.id,
                    second: second.id,
                });
            }
        }

        // 3. Per-phase rule invariants
        for phase in map.values() {
            match &phase.body {
                PhaseBody::Access | PhaseBody::Info => {}
                PhaseBody::Training(training) => {
                    validate_decision_matrix(phase.id, training, &map)?;
                }
                PhaseBody::Questionnaire(questionnaire) => {
                    validate_branch_rules(phase.id, questionnaire, &map)?;
                }
            }
        }

        // 4. Declared relations must reference existing phases
        for relation in &relations {
            for endpoint in [relation.from, relation.to] {
                if !map.contains_key(&endpoint) {
                    return Err(ValidationError::DanglingRelation(endpoint));
                }
            }
        }

        // 5. Assemble the edge set
        let mut edges: DiGraphMap<PhaseId, ()> = DiGraphMap::new();
        for id in &ordered {
            edges.add_node(*id);
        }
        for relation in &relations {
            edges.add_edge(relation.from, relation.to, ());
        }
        for (pos, id) in ordered.iter().enumerate() {
            match &map[id].body {
                PhaseBody::Access | PhaseBody::Info => {
                    if let Some(next) = ordered.get(pos + 1) {
                        edges.add_edge(*id, *next, ());
                    }
                }
                PhaseBody::Training(training) => {
                    for rule in &training.decision_matrix {
                        edges.add_edge(*id, rule.target_phase_id, ());
                    }
                }
                PhaseBody::Questionnaire(questionnaire) => {
                    for rule in &questionnaire.branch_rules {
                        edges.add_edge(*id, rule.target_phase_id, ());
                    }
                }
            }
        }

        debug!(
            phases = ordered.len(),
            edges = edges.edge_count(),
            "built phase graph"
        );

        Ok(Self {
            phases: map,
            ordered,
            edges,
        })
    }

    /// The definition's entry point: the phase with the lowest order.
    pub fn entry(&self) -> &Phase {
        &self.phases[&self.ordered[0]]
    }

    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.get(&id)
    }

    /// The phase with the smallest order strictly greater than the
    /// given phase's order, if any. Drives access/info succession.
    pub fn successor_by_order(&self, id: PhaseId) -> Option<&Phase> {
        let pos = self.ordered.iter().position(|p| *p == id)?;
        self.ordered.get(pos + 1).map(|next| &self.phases[next])
    }

    /// Whether any declared edge leaves this phase.
    pub fn has_outgoing(&self, id: PhaseId) -> bool {
        self.edges
            .neighbors_directed(id, Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Phases in designer order.
    pub fn phases(&self) -> impl Iterator<Item = &Phase> {
        self.ordered.iter().map(|id| &self.phases[id])
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Phases a trainee can never reach from the entry point over the
    /// declared edges. Design-time feedback for dead branches.
    pub fn unreachable_phases(&self) -> Vec<PhaseId> {
        let mut seen: HashSet<PhaseId> = HashSet::with_capacity(self.ordered.len());
        let mut dfs = Dfs::new(&self.edges, self.ordered[0]);
        while let Some(id) = dfs.next(&self.edges) {
            seen.insert(id);
        }
        self.ordered
            .iter()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect()
    }
}

/// Decision matrix invariants: at least one rule, priorities matching
/// declaration order, targets resolvable, fallback (if any) last.
fn validate_decision_matrix(
    phase_id: PhaseId,
    training: &TrainingPhase,
    phases: &HashMap<PhaseId, Phase>,
) -> Result<(), ValidationError> {
    if training.decision_matrix.is_empty() {
        return Err(ValidationError::EmptyRuleSet(phase_id));
    }
    let last = training.decision_matrix.len() - 1;
    for (pos, rule) in training.decision_matrix.iter().enumerate() {
        if rule.priority as usize != pos {
            return Err(ValidationError::PriorityMismatch {
                rule: rule.id,
                expected: pos as u32,
                found: rule.priority,
            });
        }
        if !phases.contains_key(&rule.target_phase_id) {
            return Err(ValidationError::DanglingTarget {
                rule: rule.id,
                target: rule.target_phase_id,
            });
        }
        if rule.conditions.is_unconditional() && pos != last {
            return Err(ValidationError::MisplacedFallback {
                phase: phase_id,
                rule: rule.id,
            });
        }
    }
    Ok(())
}

/// Branch rule invariants: at least one rule, priorities matching
/// declaration order, targets resolvable, rates in range, question
/// selections non-empty and local to the phase.
fn validate_branch_rules(
    phase_id: PhaseId,
    questionnaire: &QuestionnairePhase,
    phases: &HashMap<PhaseId, Phase>,
) -> Result<(), ValidationError> {
    if questionnaire.branch_rules.is_empty() {
        return Err(ValidationError::EmptyRuleSet(phase_id));
    }
    let known: HashSet<_> = questionnaire.questions.iter().map(|q| q.id).collect();
    for (pos, rule) in questionnaire.branch_rules.iter().enumerate() {
        if rule.priority as usize != pos {
            return Err(ValidationError::PriorityMismatch {
                rule: rule.id,
                expected: pos as u32,
                found: rule.priority,
            });
        }
        if !phases.contains_key(&rule.target_phase_id) {
            return Err(ValidationError::DanglingTarget {
                rule: rule.id,
                target: rule.target_phase_id,
            });
        }
        if rule.required_success_rate > 100 {
            return Err(ValidationError::SuccessRateOutOfRange {
                rule: rule.id,
                value: rule.required_success_rate,
            });
        }
        if rule.evaluated_question_ids.is_empty() {
            return Err(ValidationError::EmptyQuestionSelection { rule: rule.id });
        }
        for question in &rule.evaluated_question_ids {
            if !known.contains(question) {
                return Err(ValidationError::UnknownQuestion {
                    rule: rule.id,
                    question: *question,
                });
            }
        }
    }
    Ok(())
}
