//! Surface pipeline stages, driven by `app::execute_run`.
//!
//! The validation gates run in a fixed order and the first failure aborts:
//! point geometry -> numeric fields -> projected CRS -> densify -> equal `m`.
//! Nothing is written until every gate has passed, and a failed write leaves
//! no output behind.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::domain::PointTable;
use crate::error::AppError;
use crate::io::export::write_grid_csv;
use crate::models::{EdgeSeries, SurfaceGrid, ensure_equal_m, ensure_numeric, ensure_point};

/// What went into one edge, for reporting.
#[derive(Debug, Clone)]
pub struct EdgeSummary {
    pub path: PathBuf,
    pub field_m: String,
    pub field_z: String,
    pub input_points: usize,
    pub m_min: f64,
    pub m_max: f64,
}

/// An edge that passed the per-input gates and has its fields selected.
#[derive(Debug, Clone)]
pub struct PreparedEdge {
    pub edge: EdgeSeries,
    pub summary: EdgeSummary,
}

/// All outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub edge1: EdgeSummary,
    pub edge2: EdgeSummary,
    pub pitch: f64,
    pub grid: SurfaceGrid,
    pub output: PathBuf,
    pub export_csv: Option<PathBuf>,
}

/// Run the geometry and field-type gates on a loaded table, then narrow it
/// to `(m, z)` sorted by `m`.
pub fn prepare_edge(
    table: PointTable,
    path: &Path,
    field_m: &str,
    field_z: &str,
    label: &str,
) -> Result<PreparedEdge, AppError> {
    let input_points = table.len();
    let mut edge = EdgeSeries::from_table(table);

    ensure_point(&edge, label)?;
    for field in [field_m, field_z] {
        ensure_numeric(&edge, field, label)?;
    }
    edge.select_fields(field_m, field_z)?;

    let (m_min, m_max) = edge
        .m_range()
        .ok_or_else(|| AppError::invalid(format!("{label}: no points after field selection.")))?;
    info!("{label}: {input_points} points, m=[{m_min}, {m_max}]");

    Ok(PreparedEdge {
        edge,
        summary: EdgeSummary {
            path: path.to_path_buf(),
            field_m: field_m.to_string(),
            field_z: field_z.to_string(),
            input_points,
            m_min,
            m_max,
        },
    })
}

/// Densify both edges, check their `m` samples agree, and interpolate the
/// surface between them.
pub fn build_surface(
    edge1: &mut EdgeSeries,
    edge2: &mut EdgeSeries,
    pitch: f64,
    i_div: usize,
) -> Result<SurfaceGrid, AppError> {
    edge1.densify(pitch)?;
    edge2.densify(pitch)?;
    ensure_equal_m(edge1, edge2)?;
    info!("densified both edges to {} rows at pitch {pitch}", edge1.records().len());

    let mut grid = SurfaceGrid::new(edge1.crs().cloned());
    grid.interpolate_crosswide(edge1, edge2, i_div)?;
    info!("grid: {} rows x {} columns", grid.rows(), grid.columns());
    Ok(grid)
}

/// Write the GeoJSON output and the optional CSV export.
///
/// If the CSV export fails, the GeoJSON just written is removed again.
pub fn write_outputs(grid: &SurfaceGrid, output: &Path, export_csv: Option<&Path>) -> Result<(), AppError> {
    grid.output(output)?;
    let Some(csv_path) = export_csv else {
        return Ok(());
    };
    if let Err(err) = write_grid_csv(csv_path, grid) {
        for path in [output, csv_path] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("failed to remove partial output {}: {e}", path.display());
                }
            }
        }
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EdgeRecord;
    use crate::error::ErrorKind;

    fn edge(dy: f64) -> EdgeSeries {
        let records = [(0.0, 1.0), (10.0, 2.0)]
            .iter()
            .map(|&(m, z)| EdgeRecord { m, z, x: m, y: dy })
            .collect();
        EdgeSeries::from_records(records, None)
    }

    #[test]
    fn build_then_write_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let (mut e1, mut e2) = (edge(0.0), edge(4.0));
        let grid = build_surface(&mut e1, &mut e2, 5.0, 2).unwrap();
        assert_eq!((grid.rows(), grid.columns()), (3, 3));

        let out = dir.path().join("grid.geojson");
        let csv = dir.path().join("grid.csv");
        write_outputs(&grid, &out, Some(&csv)).unwrap();
        assert!(out.is_file());
        assert!(csv.is_file());
    }

    #[test]
    fn failed_csv_export_removes_geojson() {
        let dir = tempfile::tempdir().unwrap();
        let (mut e1, mut e2) = (edge(0.0), edge(4.0));
        let grid = build_surface(&mut e1, &mut e2, 5.0, 2).unwrap();

        let out = dir.path().join("grid.geojson");
        let csv = dir.path().join("missing").join("grid.csv");
        let err = write_outputs(&grid, &out, Some(&csv)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!out.exists());
    }

    #[test]
    fn mismatched_samples_fail_before_grid() {
        let mut e1 = edge(0.0);
        let records = [(0.0, 1.0), (12.0, 2.0)]
            .iter()
            .map(|&(m, z)| EdgeRecord { m, z, x: m, y: 4.0 })
            .collect();
        let mut e2 = EdgeSeries::from_records(records, None);
        let err = build_surface(&mut e1, &mut e2, 5.0, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LongitudinalMismatch);
    }
}
