//! Piecewise-linear interpolation.
//!
//! Two flavours are needed:
//!
//! - along an edge, a 1-D interpolant over sorted knots (`m -> value`)
//! - across the surface, a closed-form blend between two boundary values
//!
//! Neither extrapolates.

use crate::error::AppError;

/// Linear interpolant over strictly increasing knots.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    knots: Vec<f64>,
    values: Vec<f64>,
}

impl LinearInterpolant {
    /// Build an interpolant from `(knot, value)` pairs.
    ///
    /// Requires at least two knots, strictly increasing, all finite.
    pub fn new(knots: Vec<f64>, values: Vec<f64>) -> Result<Self, AppError> {
        if knots.len() != values.len() {
            return Err(AppError::invalid(format!(
                "Interpolant needs one value per knot (got {} knots, {} values).",
                knots.len(),
                values.len()
            )));
        }
        if knots.len() < 2 {
            return Err(AppError::invalid(format!(
                "Linear interpolation needs at least 2 samples (got {}).",
                knots.len()
            )));
        }
        if let Some(bad) = knots.iter().chain(values.iter()).find(|v| !v.is_finite()) {
            return Err(AppError::invalid(format!("Non-finite interpolation input: {bad}.")));
        }
        if let Some(w) = knots.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AppError::invalid(format!(
                "Interpolation knots must be strictly increasing (found {} followed by {}).",
                w[0], w[1]
            )));
        }
        Ok(Self { knots, values })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluate at `x`. Returns `None` outside `[first knot, last knot]`.
    ///
    /// At a knot the stored value is returned as-is.
    pub fn eval(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return None;
        }

        let idx = self.knots.partition_point(|&k| k < x);
        if self.knots[idx] == x {
            return Some(self.values[idx]);
        }

        let (k0, k1) = (self.knots[idx - 1], self.knots[idx]);
        let (v0, v1) = (self.values[idx - 1], self.values[idx]);
        let t = (x - k0) / (k1 - k0);
        Some(v0 + t * (v1 - v0))
    }
}

/// Blend between `v0` (at step 0) and `v1` (at step `steps`).
///
/// The end steps return the inputs unchanged, so boundaries are bit-exact.
pub fn lerp_steps(v0: f64, v1: f64, step: usize, steps: usize) -> f64 {
    if step == 0 {
        return v0;
    }
    if step >= steps {
        return v1;
    }
    v0 + (v1 - v0) * step as f64 / steps as f64
}
