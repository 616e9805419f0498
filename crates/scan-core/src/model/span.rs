//! Step fitting and point placement along one axis.
//!
//! Both the axial and the two-axis models place points with the same rules,
//! so the arithmetic lives here once:
//!
//! - Without `bounds_to_fit`, `n > 1` points run evenly from the start to
//!   the end of the range and a single point sits at the start.
//! - With `bounds_to_fit`, points sit at the centres of `n` equal cells.
//!
//! Step based models are turned into point counts by [`fit_steps`].

use crate::error::{ScanError, ScanResult};
use crate::limits::STEP_COUNT_TOLERANCE;

/// Point count and adjusted length produced by fitting a step into a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFit {
    /// Number of points.
    pub points: usize,
    /// Length of the range after trimming to whole steps.
    pub length: f64,
}

/// Fit `step` into `length`.
///
/// The count tolerates [`STEP_COUNT_TOLERANCE`] of a step of rounding and
/// otherwise truncates, so the trimmed range never exceeds the original.
///
/// A step longer than the range yields a single point rather than an error.
/// Without `bounds_to_fit` the range grows to one step so that the point
/// still has a well defined cell; with it the range is kept and the point
/// lands in its centre.
pub fn fit_steps(length: f64, step: f64, bounds_to_fit: bool, axis: &str) -> ScanResult<StepFit> {
    if step == 0.0 || !step.is_finite() {
        return Err(ScanError::generation(format!(
            "step for axis '{axis}' must be finite and non-zero, got {step}"
        )));
    }
    if !length.is_finite() {
        return Err(ScanError::generation(format!(
            "length for axis '{axis}' must be finite, got {length}"
        )));
    }
    if length != 0.0 && length.signum() != step.signum() {
        return Err(ScanError::generation(format!(
            "step {step} for axis '{axis}' points away from a range of length {length}"
        )));
    }

    let whole = (length / step + STEP_COUNT_TOLERANCE).floor();
    if whole > usize::MAX as f64 / 2.0 {
        return Err(ScanError::SizeOverflow {
            context: "step count",
        });
    }
    let whole = whole as usize;

    let fit = if bounds_to_fit {
        match whole {
            0 => StepFit { points: 1, length },
            n => StepFit {
                points: n,
                length: n as f64 * step,
            },
        }
    } else {
        match whole {
            0 => StepFit {
                points: 1,
                length: step,
            },
            n => StepFit {
                points: n + 1,
                length: n as f64 * step,
            },
        }
    };
    Ok(fit)
}

/// Concrete placement of points along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpan {
    /// First point.
    pub first: f64,
    /// Last point.
    pub last: f64,
    /// Number of points.
    pub points: usize,
    /// Half the signed distance between neighbouring points.
    pub half_step: f64,
}

impl AxisSpan {
    /// Place `points` points on the range `[start, start + length]`.
    pub fn place(start: f64, length: f64, points: usize, bounds_to_fit: bool) -> Self {
        let n = points.max(1);
        if bounds_to_fit {
            let cell = length / n as f64;
            Self {
                first: start + cell / 2.0,
                last: start + length - cell / 2.0,
                points: n,
                half_step: cell / 2.0,
            }
        } else if n == 1 {
            Self {
                first: start,
                last: start,
                points: 1,
                half_step: length / 2.0,
            }
        } else {
            Self {
                first: start,
                last: start + length,
                points: n,
                half_step: length / (n - 1) as f64 / 2.0,
            }
        }
    }

    /// Value of point `i`, matching how line trajectories evaluate.
    pub fn value(&self, i: usize) -> f64 {
        if self.points <= 1 {
            self.first
        } else {
            self.first + i as f64 * ((self.last - self.first) / (self.points - 1) as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_exact_steps() {
        let fit = fit_steps(10.0, 1.0, false, "T").unwrap();
        assert_eq!(fit.points, 11);
        assert!((fit.length - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_tolerates_rounding() {
        // 4.995 / 1.0 is within 1% of five steps.
        let fit = fit_steps(4.995, 1.0, false, "x").unwrap();
        assert_eq!(fit.points, 6);
        let fit = fit_steps(4.98, 1.0, false, "x").unwrap();
        assert_eq!(fit.points, 5);
    }

    #[test]
    fn test_fit_trims_to_whole_steps() {
        let fit = fit_steps(5.0, 0.3, false, "x").unwrap();
        assert_eq!(fit.points, 17);
        assert!((fit.length - 4.8).abs() < 1e-12);

        let fit = fit_steps(5.0, 0.3, true, "x").unwrap();
        assert_eq!(fit.points, 16);
        assert!((fit.length - 4.8).abs() < 1e-12);
    }

    #[test]
    fn test_oversized_step_yields_single_point() {
        let fit = fit_steps(1.0, 4.0, false, "x").unwrap();
        assert_eq!(fit, StepFit { points: 1, length: 4.0 });

        let fit = fit_steps(1.0, 4.0, true, "x").unwrap();
        assert_eq!(fit, StepFit { points: 1, length: 1.0 });
    }

    #[test]
    fn test_negative_steps_follow_negative_lengths() {
        let fit = fit_steps(-5.0, -0.2, true, "y").unwrap();
        assert_eq!(fit.points, 25);
        assert!((fit.length + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_direction_and_zero_step_fail() {
        assert!(fit_steps(5.0, -0.3, false, "x").unwrap_err().is_generation());
        assert!(fit_steps(5.0, 0.0, false, "x").unwrap_err().is_generation());
    }

    #[test]
    fn test_place_cell_centres() {
        let span = AxisSpan::place(0.0, 5.0, 10, true);
        assert!((span.first - 0.25).abs() < 1e-12);
        assert!((span.last - 4.75).abs() < 1e-12);
        assert!((span.half_step - 0.25).abs() < 1e-12);

        let single = AxisSpan::place(0.0, -5.0, 1, true);
        assert!((single.first + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_place_linspace() {
        let span = AxisSpan::place(0.0, 3.0, 20, false);
        assert!((span.value(2) - 2.0 * 3.0 / 19.0).abs() < 1e-12);
        assert!((span.value(19) - 3.0).abs() < 1e-12);
    }
}
