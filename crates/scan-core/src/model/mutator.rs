//! Mutator declarations.
//!
//! Mutators perturb positions after composition. Only their parameters live
//! here; the engine turns them into pipeline stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deterministic pseudo-random offset added to selected axes.
///
/// The offset for an axis is `max_offset * (2u - 1)` with `u` drawn
/// uniformly from `[0, 1)`, keyed by the seed, the axis and the step index.
/// The same seed always yields the same offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomOffsetMutator {
    /// Seed of the offset stream.
    pub seed: u64,
    /// Axes to perturb, in declaration order.
    pub axes: Vec<String>,
    /// Largest absolute offset per axis.
    pub max_offset: BTreeMap<String, f64>,
}

impl RandomOffsetMutator {
    /// Mutator perturbing every axis in `max_offset`.
    pub fn new(seed: u64, max_offset: BTreeMap<String, f64>) -> Self {
        Self {
            seed,
            axes: max_offset.keys().cloned().collect(),
            max_offset,
        }
    }
}

/// Closed set of mutator kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutatorModel {
    /// See [`RandomOffsetMutator`].
    RandomOffset(RandomOffsetMutator),
}

impl MutatorModel {
    /// Axes the mutator touches.
    pub fn axes(&self) -> &[String] {
        match self {
            Self::RandomOffset(m) => &m.axes,
        }
    }
}

impl From<RandomOffsetMutator> for MutatorModel {
    fn from(mutator: RandomOffsetMutator) -> Self {
        Self::RandomOffset(mutator)
    }
}
