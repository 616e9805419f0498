//! Shared numeric tolerances and hard limits.
//!
//! Centralizing these keeps step counting, region edges and configuration
//! defaults consistent between the model layer and the generator engine.

use crate::error::{ScanError, ScanResult};

// =============================================================================
// Tolerances
// =============================================================================

/// Fraction of a step accepted as rounding error when counting steps.
///
/// A length of `4.995` with a step of `1.0` counts as five whole steps.
pub const STEP_COUNT_TOLERANCE: f64 = 0.01;

/// Absolute slack applied to region edges and on-line tests.
///
/// Points computed as `start + i * step` can land a few ulps outside a
/// boundary they nominally sit on.
pub const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// Relative slack used when comparing bounds at sequence joins.
pub const JOIN_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Defaults
// =============================================================================

/// Units assigned to axes that do not declare any.
pub const DEFAULT_UNITS: &str = "mm";

/// Default cap on points enumerated while computing a region mask.
pub const DEFAULT_MAX_MASK_EVALUATIONS: usize = 50_000_000;

/// Default cap on points produced by the eager `create_points` form.
pub const DEFAULT_MAX_MATERIALIZED_POINTS: usize = 20_000_000;

/// Multiply dimension extents, failing on overflow.
pub fn checked_product(extents: &[usize], context: &'static str) -> ScanResult<usize> {
    extents.iter().try_fold(1usize, |acc, &len| {
        acc.checked_mul(len)
            .ok_or(ScanError::SizeOverflow { context })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_product() {
        assert_eq!(checked_product(&[6, 6], "shape").ok(), Some(36));
        assert_eq!(checked_product(&[], "shape").ok(), Some(1));
        assert!(matches!(
            checked_product(&[usize::MAX, 2], "shape"),
            Err(ScanError::SizeOverflow { context: "shape" })
        ));
    }
}
