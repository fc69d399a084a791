//! The interpolated surface between two edges.

use std::path::Path;

use log::debug;

use crate::domain::{Crs, EdgeRecord, GridRecord};
use crate::error::AppError;
use crate::math::lerp_steps;
use crate::models::EdgeSeries;

/// Regular grid of points spanning two densified edges.
///
/// Records are stored transverse-major: every longitudinal row for `i = 0`,
/// then every row for `i = 1`, and so on up to `i = i_div`.
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    crs: Option<Crs>,
    i_div: usize,
    rows: usize,
    records: Vec<GridRecord>,
}

impl SurfaceGrid {
    /// An empty grid in the given CRS.
    pub fn new(crs: Option<Crs>) -> Self {
        Self {
            crs,
            i_div: 0,
            rows: 0,
            records: Vec::new(),
        }
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn records(&self) -> &[GridRecord] {
        &self.records
    }

    /// Longitudinal rows per transverse column.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Transverse columns (`i_div + 1` once populated).
    pub fn columns(&self) -> usize {
        if self.records.is_empty() { 0 } else { self.i_div + 1 }
    }

    pub fn i_div(&self) -> usize {
        self.i_div
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Node at longitudinal `row`, transverse index `i`.
    pub fn get(&self, row: usize, i: usize) -> Option<&GridRecord> {
        if row >= self.rows || i > self.i_div {
            return None;
        }
        self.records.get(i * self.rows + row)
    }

    /// Fill the grid by interpolating across from `edge1` (`i = 0`) to
    /// `edge2` (`i = i_div`).
    ///
    /// Both edges must already be densified onto the same `m` samples; only
    /// the row counts are checked here. Channels `x`, `y`, `m`, `z` are
    /// interpolated independently per row with
    /// `v0 + (v1 - v0) * i / i_div`, boundary columns copied verbatim.
    pub fn interpolate_crosswide(
        &mut self,
        edge1: &EdgeSeries,
        edge2: &EdgeSeries,
        i_div: usize,
    ) -> Result<(), AppError> {
        if i_div == 0 {
            return Err(AppError::invalid(
                "Transverse subdivision count must be >= 1.",
            ));
        }
        let (rec1, rec2) = (edge1.records(), edge2.records());
        if rec1.len() != rec2.len() {
            return Err(AppError::invalid(format!(
                "Edges have different row counts ({} vs {}).",
                rec1.len(),
                rec2.len()
            )));
        }
        if rec1.is_empty() {
            return Err(AppError::invalid("Edges contain no rows to interpolate."));
        }

        let rows = rec1.len();
        let mut records = Vec::with_capacity(rows * (i_div + 1));
        for i in 0..=i_div {
            for (a, b) in rec1.iter().zip(rec2) {
                records.push(blend(a, b, i, i_div));
            }
        }

        debug!(
            "interpolated {rows} rows x {} columns = {} nodes",
            i_div + 1,
            records.len()
        );
        self.i_div = i_div;
        self.rows = rows;
        self.records = records;
        Ok(())
    }

    /// Write the grid as GeoJSON (`i`, `m`, `z` + 3-D point geometry).
    pub fn output(&self, path: &Path) -> Result<(), AppError> {
        crate::io::export::write_grid_geojson(path, self)
    }
}

fn blend(a: &EdgeRecord, b: &EdgeRecord, i: usize, i_div: usize) -> GridRecord {
    GridRecord {
        i,
        x: lerp_steps(a.x, b.x, i, i_div),
        y: lerp_steps(a.y, b.y, i, i_div),
        m: lerp_steps(a.m, b.m, i, i_div),
        z: lerp_steps(a.z, b.z, i, i_div),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Reference edges: `x = m`, z 10..14, `y = m` and `y = m + 100`.
    fn reference_edges() -> (EdgeSeries, EdgeSeries) {
        let make = |dy: f64| {
            let records = (0..5)
                .map(|k| {
                    let m = k as f64 * 100.0;
                    EdgeRecord {
                        m,
                        z: 10.0 + k as f64,
                        x: m,
                        y: m + dy,
                    }
                })
                .collect();
            let mut edge = EdgeSeries::from_records(records, Some(Crs::from_epsg(2449)));
            edge.densify(10.0).unwrap();
            edge
        };
        (make(0.0), make(100.0))
    }

    fn reference_grid() -> SurfaceGrid {
        let (e1, e2) = reference_edges();
        let mut grid = SurfaceGrid::new(e1.crs().cloned());
        grid.interpolate_crosswide(&e1, &e2, 10).unwrap();
        grid
    }

    #[test]
    fn grid_shape_and_order() {
        let grid = reference_grid();
        assert_eq!(grid.rows(), 41);
        assert_eq!(grid.columns(), 11);
        assert_eq!(grid.records().len(), 41 * 11);
        assert_eq!(grid.records()[0].i, 0);
        assert_eq!(grid.records()[41].i, 1);
        assert_eq!(grid.records()[450].i, 10);
    }

    #[test]
    fn reference_nodes() {
        let grid = reference_grid();

        let r = grid.records()[0];
        assert_eq!((r.i, r.x, r.y, r.m, r.z), (0, 0.0, 0.0, 0.0, 10.0));

        let r = grid.records()[100];
        assert_eq!(r.i, 2);
        assert_relative_eq!(r.x, 180.0, epsilon = 1e-9);
        assert_relative_eq!(r.y, 200.0, epsilon = 1e-9);
        assert_relative_eq!(r.m, 180.0, epsilon = 1e-9);
        assert_relative_eq!(r.z, 11.8, epsilon = 1e-9);
        assert_eq!(grid.get(18, 2), Some(&r));

        let r = grid.records()[450];
        assert_eq!((r.i, r.x, r.y, r.m, r.z), (10, 400.0, 500.0, 400.0, 14.0));
        assert_eq!(r.point(), [400.0, 500.0, 14.0]);
    }

    #[test]
    fn boundary_columns_are_bit_exact() {
        let (e1, e2) = reference_edges();
        let mut grid = SurfaceGrid::new(None);
        grid.interpolate_crosswide(&e1, &e2, 7).unwrap();
        for (row, (a, b)) in e1.records().iter().zip(e2.records()).enumerate() {
            let first = grid.get(row, 0).unwrap();
            let last = grid.get(row, 7).unwrap();
            assert_eq!((first.x, first.y, first.m, first.z), (a.x, a.y, a.m, a.z));
            assert_eq!((last.x, last.y, last.m, last.z), (b.x, b.y, b.m, b.z));
        }
    }

    #[test]
    fn interior_values_lie_between_boundaries() {
        let e1 = EdgeSeries::from_records(
            vec![
                EdgeRecord { m: 0.0, z: 3.3, x: 1.7, y: -4.1 },
                EdgeRecord { m: 1.0, z: -0.2, x: 2.9, y: 8.0 },
            ],
            None,
        );
        let e2 = EdgeSeries::from_records(
            vec![
                EdgeRecord { m: 0.0, z: -7.0, x: 11.3, y: 0.3 },
                EdgeRecord { m: 1.0, z: 5.5, x: -3.0, y: 8.0 },
            ],
            None,
        );
        let mut grid = SurfaceGrid::new(None);
        grid.interpolate_crosswide(&e1, &e2, 9).unwrap();

        let within = |v: f64, a: f64, b: f64| v >= a.min(b) && v <= a.max(b);
        for row in 0..grid.rows() {
            let (a, b) = (grid.get(row, 0).unwrap(), grid.get(row, 9).unwrap());
            let mut prev = *a;
            for i in 1..=9 {
                let r = grid.get(row, i).unwrap();
                assert!(within(r.x, a.x, b.x));
                assert!(within(r.y, a.y, b.y));
                assert!(within(r.z, a.z, b.z));
                // monotone in each channel
                assert!((r.x - prev.x) * (b.x - a.x) >= 0.0);
                assert!((r.z - prev.z) * (b.z - a.z) >= 0.0);
                prev = *r;
            }
        }
    }

    #[test]
    fn rejects_zero_divisions_and_mismatched_rows() {
        let (e1, e2) = reference_edges();
        let mut grid = SurfaceGrid::new(None);
        assert!(grid.interpolate_crosswide(&e1, &e2, 0).is_err());

        let short = EdgeSeries::from_records(e2.records()[..3].to_vec(), None);
        assert!(grid.interpolate_crosswide(&e1, &short, 4).is_err());
        assert!(grid.is_empty());
        assert_eq!(grid.columns(), 0);
    }
}
