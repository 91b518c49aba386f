//! Path simulator state machine.
//!
//! Drives the traversal loop: start at the entry phase, ask the
//! matching evaluator for the next edge, append a path node, and stop
//! on an end phase, a stall, or an exhausted revisit budget. One run
//! is a deterministic, synchronous function of its graph and profile
//! snapshots; the simulator keeps no state between runs.

use crate::evaluator::{evaluate, Decision};
use crate::path::SimulatedPath;
use crate::profile::{PerformanceProfile, PhaseSample};
use adapt_model::{PhaseGraph, PhaseId};
use std::collections::HashMap;
use tracing::{debug, debug_span, warn};

/// Default number of times a single phase may be entered in one run.
pub const DEFAULT_REVISIT_BOUND: u32 = 10;

/// Simulator-level knobs.
///
/// The revisit bound lives here rather than on the definition because
/// definitions declare no loop limit of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// A run aborts with [`SimulationOutcome::LoopAborted`] once any
    /// phase would be entered more than this many times.
    pub revisit_bound: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            revisit_bound: DEFAULT_REVISIT_BOUND,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_revisit_bound(mut self, bound: u32) -> Self {
        self.revisit_bound = bound;
        self
    }
}

/// Terminal result of one simulation run.
///
/// `Stalled` and `LoopAborted` are completed computations, not errors:
/// they carry the partial path and the inputs that produced them so
/// the designer can see exactly why branching failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// The traversal finished on an end phase.
    Completed { path: SimulatedPath },
    /// No rule matched on a phase that is not an end phase. `sample`
    /// holds the evaluated profile values that produced no match.
    Stalled {
        path: SimulatedPath,
        phase_id: PhaseId,
        sample: PhaseSample,
    },
    /// A phase was about to be entered past the configured revisit
    /// bound; `visits` is the counter value that tripped it.
    LoopAborted {
        path: SimulatedPath,
        phase_id: PhaseId,
        visits: u32,
    },
}

impl SimulationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The (possibly partial) path, whatever the outcome.
    pub fn path(&self) -> &SimulatedPath {
        match self {
            Self::Completed { path }
            | Self::Stalled { path, .. }
            | Self::LoopAborted { path, .. } => path,
        }
    }
}

/// Synchronous, single-threaded traversal driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSimulator {
    config: SimulatorConfig,
}

impl PathSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SimulatorConfig {
        self.config
    }

    /// Simulate the path a trainee matching `profile` would take
    /// through `graph`. Always terminates: the revisit bound caps the
    /// traversal even for definitions that cycle unconditionally.
    pub fn run(&self, graph: &PhaseGraph, profile: &PerformanceProfile) -> SimulationOutcome {
        let span = debug_span!(
            "simulate_path",
            phases = graph.len(),
            revisit_bound = self.config.revisit_bound
        );
        let _guard = span.enter();

        let mut path = SimulatedPath::default();
        let mut visits: HashMap<PhaseId, u32> = HashMap::new();
        let mut current = graph.entry();

        loop {
            let count = visits.entry(current.id).or_insert(0);
            *count += 1;
            if *count > self.config.revisit_bound {
                warn!(phase = %current.id, visits = *count, "revisit bound exceeded, aborting");
                return SimulationOutcome::LoopAborted {
                    path,
                    phase_id: current.id,
                    visits: *count,
                };
            }
            path.push(current);

            let sample = profile.sample(current.id);
            match evaluate(graph, current, &sample) {
                Decision::Target(next_id) => {
                    // Targets are checked at build time, so the lookup
                    // only fails if graph and decision disagree.
                    let Some(next) = graph.phase(next_id) else {
                        warn!(phase = %next_id, "evaluator chose a phase the graph does not hold");
                        return SimulationOutcome::Stalled {
                            path,
                            phase_id: current.id,
                            sample,
                        };
                    };
                    debug!(from = %current.id, to = %next_id, "advance");
                    current = next;
                }
                Decision::NoMatch if current.is_end => {
                    debug!(phase = %current.id, steps = path.len(), "end phase reached");
                    return SimulationOutcome::Completed { path };
                }
                Decision::NoMatch => {
                    warn!(phase = %current.id, "no branch rule matched outside an end phase");
                    return SimulationOutcome::Stalled {
                        path,
                        phase_id: current.id,
                        sample,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_builder() {
        let config = SimulatorConfig::new();
        assert_eq!(config.revisit_bound, DEFAULT_REVISIT_BOUND);
        assert_eq!(config.with_revisit_bound(3).revisit_bound, 3);
    }

    #[test]
    fn outcome_exposes_path_uniformly() {
        let outcome = SimulationOutcome::Completed {
            path: SimulatedPath::default(),
        };
        assert!(outcome.is_completed());
        assert!(outcome.path().is_empty());
    }
}
