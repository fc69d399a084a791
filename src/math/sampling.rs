//! Evenly pitched sample generation.

use crate::error::AppError;

/// Upper bound on generated samples, to catch a pitch that is tiny relative
/// to the edge length before allocating for it.
const MAX_SAMPLES: usize = 10_000_000;

/// Samples `min + k * pitch` for `k >= 0` while `< max`, followed by `max`.
///
/// The last interval may be shorter than `pitch`; `max` is always present.
/// Each sample is computed from `k` directly so that values such as `150.0`
/// come out exact instead of drifting through repeated addition.
pub fn pitch_samples(min: f64, max: f64, pitch: f64) -> Result<Vec<f64>, AppError> {
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(AppError::invalid(format!(
            "Invalid pitch: {pitch} (must be finite and > 0)."
        )));
    }
    if !(min.is_finite() && max.is_finite() && min <= max) {
        return Err(AppError::invalid(format!(
            "Invalid sampling range: min={min}, max={max}."
        )));
    }

    let estimate = ((max - min) / pitch).ceil();
    if estimate >= MAX_SAMPLES as f64 {
        return Err(AppError::invalid(format!(
            "Pitch {pitch} would produce about {estimate} samples over [{min}, {max}]; use a larger pitch."
        )));
    }

    let mut out = Vec::with_capacity(estimate as usize + 1);
    let mut k = 0usize;
    loop {
        let v = min + k as f64 * pitch;
        if v >= max {
            break;
        }
        out.push(v);
        k += 1;
    }
    out.push(max);
    Ok(out)
}
