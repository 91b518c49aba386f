//! Designer-edited performance profiles.
//!
//! A profile holds the hypothetical measurements the simulator is run
//! against, keyed by phase id and independent of the graph so the
//! designer can edit values and replay without rebuilding the
//! definition. Missing entries are never an error: they read as the
//! all-zero/false sample, letting a designer simulate a partial
//! profile incrementally.

use adapt_model::{PhaseId, QuestionId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Hypothetical measurements for one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseSample {
    pub wrong_answers: u32,
    pub commands_entered: u32,
    pub completion_time_secs: u64,
    pub solution_displayed: bool,
    pub questionnaire_answered: bool,
    /// Designer-asserted correctness per question.
    pub answers: HashMap<QuestionId, bool>,
}

impl PhaseSample {
    /// Whether the designer marked this question correct. An
    /// unanswered question counts as incorrect.
    pub fn is_correct(&self, question: QuestionId) -> bool {
        self.answers.get(&question).copied().unwrap_or(false)
    }
}

/// The full what-if profile for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    samples: HashMap<PhaseId, PhaseSample>,
}

impl PerformanceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sample(&mut self, phase: PhaseId, sample: PhaseSample) {
        self.samples.insert(phase, sample);
    }

    pub fn remove_sample(&mut self, phase: PhaseId) {
        self.samples.remove(&phase);
    }

    pub fn get(&self, phase: PhaseId) -> Option<&PhaseSample> {
        self.samples.get(&phase)
    }

    /// The sample for a phase, or the all-zero default when the
    /// designer has not supplied one yet.
    pub fn sample(&self, phase: PhaseId) -> PhaseSample {
        self.samples.get(&phase).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Session-scoped holder for the profile the designer is editing.
///
/// Edits replace the whole profile; a simulation grabs an `Arc`
/// snapshot up front, so a run in flight never observes a
/// half-applied edit and a newer edit publishes atomically.
#[derive(Debug, Default)]
pub struct ProfileStore {
    current: RwLock<Arc<PerformanceProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held profile wholesale.
    pub fn replace(&self, profile: PerformanceProfile) {
        *self.current.write() = Arc::new(profile);
    }

    /// The current immutable profile snapshot.
    pub fn snapshot(&self) -> Arc<PerformanceProfile> {
        Arc::clone(&self.current.read())
    }

    pub fn clear(&self) {
        self.replace(PerformanceProfile::default());
    }
}
