//! Design-time path simulator for adaptive training definitions.
//!
//! Given a validated [`adapt_model::PhaseGraph`] and a designer-edited
//! what-if [`profile::PerformanceProfile`], the simulator computes the
//! sequence of phases and representative tasks a trainee matching that
//! profile would traverse, entirely locally. Dead ends, runaway loops,
//! and contradictory thresholds surface as first-class
//! [`simulator::SimulationOutcome`] diagnostics, never as errors.

pub mod evaluator;
pub mod path;
pub mod profile;
pub mod simulator;

pub use evaluator::*;
pub use path::*;
pub use profile::*;
pub use simulator::*;
