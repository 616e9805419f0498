//! Mutator stages and deduplication.
//!
//! [`RandomOffsetStage`] adds a bounded pseudo-random offset to selected
//! axes. The random stream is a `ChaCha8Rng` seeded from the mutator seed,
//! with one stream per perturbed axis and the word position derived from the
//! step index. Every offset is therefore a pure function of
//! `(seed, axis, step index)`, so lazy iteration, random access and the eager
//! list agree, and nested scans whose mutators were lifted to the top see
//! offsets keyed by the global step index.

use crate::pipeline::PointStage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::{MutatorModel, RandomOffsetMutator};
use scan_core::position::Position;
use tracing::debug;

/// Random offset applied per axis and step.
#[derive(Debug, Clone)]
pub struct RandomOffsetStage {
    base: ChaCha8Rng,
    // (output slot, stream id, max offset)
    targets: Vec<(usize, u64, f64)>,
}

impl RandomOffsetStage {
    /// Resolve the mutator against the output axis order.
    pub fn new(mutator: &RandomOffsetMutator, axes: &[String]) -> ScanResult<Self> {
        let targets = mutator
            .axes
            .iter()
            .enumerate()
            .map(|(stream, axis)| {
                let slot = axes.iter().position(|a| a == axis).ok_or_else(|| {
                    ScanError::validation(format!(
                        "random offset mutator names unknown axis '{axis}'"
                    ))
                })?;
                let max = mutator.max_offset.get(axis).copied().ok_or_else(|| {
                    ScanError::validation(format!(
                        "random offset mutator has no max offset for axis '{axis}'"
                    ))
                })?;
                if !max.is_finite() {
                    return Err(ScanError::validation(format!(
                        "max offset for axis '{axis}' is not finite"
                    )));
                }
                Ok((slot, stream as u64, max))
            })
            .collect::<ScanResult<_>>()?;
        Ok(Self {
            base: ChaCha8Rng::seed_from_u64(mutator.seed),
            targets,
        })
    }

    fn offset(&self, stream: u64, step_index: usize, max: f64) -> f64 {
        let mut rng = self.base.clone();
        rng.set_stream(stream);
        // An f64 draw consumes two 32-bit words
        rng.set_word_pos(step_index as u128 * 2);
        let u: f64 = rng.gen();
        max * (2.0 * u - 1.0)
    }
}

impl PointStage for RandomOffsetStage {
    fn name(&self) -> &str {
        "random_offset"
    }

    fn apply(&self, position: &mut Position) {
        let step_index = position.step_index();
        for &(slot, stream, max) in &self.targets {
            let offset = self.offset(stream, step_index, max);
            position.values_mut()[slot] += offset;
        }
    }
}

/// Drop mutators identical to an earlier one, keeping declaration order.
///
/// Mutators that differ in seed, axes or parameters are all kept, even when
/// their axis sets overlap.
pub fn dedup_mutators(mutators: impl IntoIterator<Item = MutatorModel>) -> Vec<MutatorModel> {
    let mut kept: Vec<MutatorModel> = Vec::new();
    for mutator in mutators {
        if kept.contains(&mutator) {
            debug!(axes = ?mutator.axes(), "Dropping duplicate mutator");
        } else {
            kept.push(mutator);
        }
    }
    kept
}
