//! Adaptive training definition model.
//!
//! An adaptive training definition is a directed graph of phases
//! (access, info, training, questionnaire) with ordered branching
//! rules. This crate holds the in-memory representation and the
//! build-time validation every simulation relies on: a [`PhaseGraph`]
//! can only be obtained through [`PhaseGraph::build`], so downstream
//! code never sees a structurally broken definition.

pub mod error;
pub mod graph;
pub mod types;

pub use error::*;
pub use graph::*;
pub use types::*;
