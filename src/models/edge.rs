//! A single longitudinal edge.
//!
//! An `EdgeSeries` starts life as a raw point table, is narrowed to the two
//! fields holding longitudinal distance and value (`select_fields`), and is
//! then resampled at a fixed pitch along `m` (`densify`).

use geo_types::Geometry;
use log::debug;

use crate::domain::{AttributeValue, Crs, EdgeRecord, Feature, FieldDef, FieldKind, PointTable};
use crate::error::{AppError, ErrorKind};
use crate::math::{LinearInterpolant, pitch_samples};

/// Ordered `(m, z, x, y)` samples along one edge.
#[derive(Debug, Clone)]
pub struct EdgeSeries {
    crs: Option<Crs>,
    /// Attribute schema. Reduced to the canonical `m` / `z` pair once fields
    /// have been selected.
    fields: Vec<FieldDef>,
    /// Raw features; emptied by `select_fields`.
    features: Vec<Feature>,
    records: Vec<EdgeRecord>,
}

impl EdgeSeries {
    /// Wrap a raw point table. Nothing is validated yet.
    pub fn from_table(table: PointTable) -> Self {
        Self {
            crs: table.crs,
            fields: table.fields,
            features: table.features,
            records: Vec::new(),
        }
    }

    /// Build an already-normalized edge from records.
    ///
    /// Records are sorted ascending by `m`.
    pub fn from_records(mut records: Vec<EdgeRecord>, crs: Option<Crs>) -> Self {
        records.sort_by(|a, b| a.m.total_cmp(&b.m));
        Self {
            crs,
            fields: canonical_fields(),
            features: Vec::new(),
            records,
        }
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn records(&self) -> &[EdgeRecord] {
        &self.records
    }

    pub fn m_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.m)
    }

    /// Number of normalized records; zero until fields are selected.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(m_min, m_max)` of the normalized records.
    pub fn m_range(&self) -> Option<(f64, f64)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.m, last.m))
    }

    /// True iff the first feature's geometry is a point.
    pub fn is_point(&self) -> bool {
        match self.features.first() {
            Some(feature) => matches!(feature.geometry, Geometry::Point(_)),
            // Normalized records are points by construction.
            None => !self.records.is_empty(),
        }
    }

    /// True iff `field` exists and its declared type is numeric.
    pub fn is_numeric(&self, field: &str) -> bool {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .is_some_and(|f| f.kind.is_numeric())
    }

    /// Keep only the longitudinal-distance and value fields, rename them to
    /// `m` / `z`, and sort ascending by `m`.
    ///
    /// Fails if either field is missing or not numeric, if any value in them
    /// is null, or if a geometry is not a point.
    pub fn select_fields(&mut self, field_m: &str, field_z: &str) -> Result<(), AppError> {
        if self.features.is_empty() {
            return Err(AppError::invalid("Input contains no features."));
        }

        let idx_m = self.numeric_field_index(field_m)?;
        let idx_z = self.numeric_field_index(field_z)?;

        let mut records = Vec::with_capacity(self.features.len());
        for (n, feature) in self.features.iter().enumerate() {
            let Geometry::Point(point) = &feature.geometry else {
                return Err(AppError::new(
                    ErrorKind::GeometryType,
                    format!("Feature {n} is not a point. Point geometry is required."),
                ));
            };
            let m = numeric_value(feature, idx_m, field_m, n)?;
            let z = numeric_value(feature, idx_z, field_z, n)?;
            records.push(EdgeRecord {
                m,
                z,
                x: point.x(),
                y: point.y(),
            });
        }

        records.sort_by(|a, b| a.m.total_cmp(&b.m));
        debug!(
            "selected fields m=`{field_m}` z=`{field_z}`: {} records",
            records.len()
        );

        self.records = records;
        self.fields = canonical_fields();
        self.features.clear();
        Ok(())
    }

    /// Resample the edge at `pitch` along `m`.
    ///
    /// Samples are `m_min + k * pitch` below `m_max`, plus `m_max` itself.
    /// `z`, `x`, and `y` are each linearly interpolated from the current
    /// records, which must number at least two with strictly increasing `m`.
    pub fn densify(&mut self, pitch: f64) -> Result<(), AppError> {
        if !self.features.is_empty() {
            return Err(AppError::invalid(
                "Select the `m` and `z` fields before densifying.",
            ));
        }
        if self.records.len() < 2 {
            return Err(AppError::invalid(format!(
                "An edge needs at least 2 points to interpolate (got {}).",
                self.records.len()
            )));
        }
        if let Some(w) = self.records.windows(2).find(|w| w[1].m == w[0].m) {
            return Err(AppError::invalid(format!(
                "Duplicate longitudinal distance m={} on one edge.",
                w[0].m
            )));
        }

        let (m_min, m_max) = (self.records[0].m, self.records[self.records.len() - 1].m);
        let samples = pitch_samples(m_min, m_max, pitch)?;

        let knots: Vec<f64> = self.m_values().collect();
        let f_z = LinearInterpolant::new(knots.clone(), self.records.iter().map(|r| r.z).collect())?;
        let f_x = LinearInterpolant::new(knots.clone(), self.records.iter().map(|r| r.x).collect())?;
        let f_y = LinearInterpolant::new(knots, self.records.iter().map(|r| r.y).collect())?;

        let mut out = Vec::with_capacity(samples.len());
        for m in samples {
            let (Some(z), Some(x), Some(y)) = (f_z.eval(m), f_x.eval(m), f_y.eval(m)) else {
                return Err(AppError::invalid(format!(
                    "Sample m={m} falls outside the edge range [{m_min}, {m_max}]."
                )));
            };
            out.push(EdgeRecord { m, z, x, y });
        }

        debug!(
            "densified edge over [{m_min}, {m_max}] at pitch {pitch}: {} -> {} records",
            self.records.len(),
            out.len()
        );
        self.records = out;
        Ok(())
    }

    fn numeric_field_index(&self, name: &str) -> Result<usize, AppError> {
        let idx = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| AppError::invalid(format!("Field `{name}` not found in input.")))?;
        if !self.fields[idx].kind.is_numeric() {
            return Err(AppError::new(
                ErrorKind::FieldType,
                format!("Field `{name}` must be numeric."),
            ));
        }
        Ok(idx)
    }
}

fn canonical_fields() -> Vec<FieldDef> {
    vec![
        FieldDef {
            name: "m".to_string(),
            kind: FieldKind::Real,
        },
        FieldDef {
            name: "z".to_string(),
            kind: FieldKind::Real,
        },
    ]
}

fn numeric_value(feature: &Feature, idx: usize, name: &str, n: usize) -> Result<f64, AppError> {
    let value = feature.attributes.get(idx).unwrap_or(&AttributeValue::Null);
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::FieldType,
                format!("Field `{name}` has a missing or non-numeric value on feature {n}."),
            )
        })
}
