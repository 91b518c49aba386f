//! Path nodes and the representative-task factory.
//!
//! A phase can contain several tasks, but the rendered path labels
//! each visited phase with exactly one. The factory picks that task;
//! it does not re-simulate task-level branching, which is evaluated
//! server-side.

use adapt_model::{Phase, PhaseBody, PhaseId};
use serde::{Deserialize, Serialize};

/// The task chosen to stand in for a phase on the rendered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: u64,
    pub task_order: u32,
}

/// Stand-in for phase kinds that have no task list of their own.
pub const PLACEHOLDER_TASK: TaskRef = TaskRef {
    task_id: 0,
    task_order: 0,
};

/// Pick one task to label a path node.
///
/// Training phases contribute their first-declared task; access, info,
/// and questionnaire phases present a single placeholder. A training
/// phase with an empty task list also falls back to the placeholder:
/// the factory labels nodes, it does not validate definitions.
pub fn representative_task(phase: &Phase) -> TaskRef {
    match &phase.body {
        PhaseBody::Training(training) => training
            .tasks
            .first()
            .map(|task| TaskRef {
                task_id: task.id,
                task_order: task.order,
            })
            .unwrap_or(PLACEHOLDER_TASK),
        PhaseBody::Access | PhaseBody::Info | PhaseBody::Questionnaire(_) => PLACEHOLDER_TASK,
    }
}

/// One (phase, representative task) pair in the simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    pub phase_id: PhaseId,
    pub phase_order: u32,
    pub task_id: u64,
    pub task_order: u32,
}

impl PathNode {
    pub fn for_phase(phase: &Phase) -> Self {
        let task = representative_task(phase);
        Self {
            phase_id: phase.id,
            phase_order: phase.order,
            task_id: task.task_id,
            task_order: task.task_order,
        }
    }
}

/// Ordered traversal produced by one simulation run.
///
/// Rebuilt wholesale on every run and never mutated in place once
/// published to a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedPath {
    pub nodes: Vec<PathNode>,
    /// Distinct phases referenced, in first-visit order, so a renderer
    /// needs no second lookup into the definition.
    pub phases: Vec<Phase>,
}

impl SimulatedPath {
    pub(crate) fn push(&mut self, phase: &Phase) {
        self.nodes.push(PathNode::for_phase(phase));
        if !self.phases.iter().any(|p| p.id == phase.id) {
            self.phases.push(phase.clone());
        }
    }

    pub fn last_phase_id(&self) -> Option<PhaseId> {
        self.nodes.last().map(|node| node.phase_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapt_model::{Task, TrainingPhase};

    #[test]
    fn training_node_carries_first_declared_task() {
        let phase = Phase::new(
            1,
            "training",
            PhaseBody::Training(TrainingPhase {
                tasks: vec![
                    Task {
                        id: 7,
                        order: 0,
                        title: "recon".into(),
                    },
                    Task {
                        id: 8,
                        order: 1,
                        title: "exploit".into(),
                    },
                ],
                decision_matrix: vec![],
            }),
        );

        let node = PathNode::for_phase(&phase);
        assert_eq!(node.task_id, 7);
        assert_eq!(node.task_order, 0);
        assert_eq!(node.phase_order, 1);
    }

    #[test]
    fn taskless_phases_get_the_placeholder() {
        let info = Phase::new(0, "briefing", PhaseBody::Info);
        assert_eq!(representative_task(&info), PLACEHOLDER_TASK);

        let empty_training = Phase::new(
            1,
            "training",
            PhaseBody::Training(TrainingPhase {
                tasks: vec![],
                decision_matrix: vec![],
            }),
        );
        assert_eq!(representative_task(&empty_training), PLACEHOLDER_TASK);
    }

    #[test]
    fn revisited_phase_is_listed_once() {
        let phase = Phase::new(0, "loop", PhaseBody::Info);
        let mut path = SimulatedPath::default();
        path.push(&phase);
        path.push(&phase);

        assert_eq!(path.len(), 2);
        assert_eq!(path.phases.len(), 1);
        assert_eq!(path.last_phase_id(), Some(phase.id));
    }
}
