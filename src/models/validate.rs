//! Cross-edge checks and the validation gates built on them.
//!
//! The predicates answer yes/no; the `ensure_*` gates turn a "no" into the
//! matching `AppError` so the pipeline can stop with `?`.

use crate::error::{AppError, ErrorKind};
use crate::models::EdgeSeries;

/// Both CRS defined, both projected, and the same system.
///
/// Linear interpolation of raw coordinates only makes sense in a projected
/// system, so projectedness is required even when the two systems match.
pub fn is_equal_projected_crs(edge1: &EdgeSeries, edge2: &EdgeSeries) -> bool {
    let (Some(crs1), Some(crs2)) = (edge1.crs(), edge2.crs()) else {
        return false;
    };
    if !(crs1.is_projected() && crs2.is_projected()) {
        return false;
    }
    crs1.is_equivalent(crs2)
}

/// The two `m` sequences are element-wise identical.
pub fn is_equal_m(edge1: &EdgeSeries, edge2: &EdgeSeries) -> bool {
    edge1.m_values().eq(edge2.m_values())
}

pub fn ensure_point(edge: &EdgeSeries, label: &str) -> Result<(), AppError> {
    if edge.is_point() {
        return Ok(());
    }
    Err(AppError::new(
        ErrorKind::GeometryType,
        format!("{label}: point geometry is required."),
    ))
}

pub fn ensure_numeric(edge: &EdgeSeries, field: &str, label: &str) -> Result<(), AppError> {
    if edge.is_numeric(field) {
        return Ok(());
    }
    Err(AppError::new(
        ErrorKind::FieldType,
        format!("{label}: field `{field}` must be numeric."),
    ))
}

pub fn ensure_projected_crs(edge1: &EdgeSeries, edge2: &EdgeSeries) -> Result<(), AppError> {
    if is_equal_projected_crs(edge1, edge2) {
        return Ok(());
    }
    let describe = |edge: &EdgeSeries| {
        edge.crs()
            .map(|c| c.identifier())
            .unwrap_or_else(|| "undefined".to_string())
    };
    Err(AppError::new(
        ErrorKind::CrsMismatch,
        format!(
            "Both inputs must use the same projected coordinate system (got {} and {}).",
            describe(edge1),
            describe(edge2)
        ),
    ))
}

pub fn ensure_equal_m(edge1: &EdgeSeries, edge2: &EdgeSeries) -> Result<(), AppError> {
    if is_equal_m(edge1, edge2) {
        return Ok(());
    }
    Err(AppError::new(
        ErrorKind::LongitudinalMismatch,
        format!(
            "Both inputs must share the same longitudinal distances after densification ({} vs {} samples).",
            edge1.records().len(),
            edge2.records().len()
        ),
    ))
}
