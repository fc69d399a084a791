//! Shared domain types.
//!
//! The raw side (`PointTable`, `Feature`, `FieldDef`) is what ingest produces
//! from a point-set file. The normalized side (`EdgeRecord`, `GridRecord`) is
//! what the interpolation core works on: flat scalar records whose point
//! geometry is only rebuilt when writing output.

use geo_types::Geometry;

use crate::domain::Crs;

/// Declared type of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Boolean,
    /// Generic text. Also used for columns mixing value types.
    Text,
    /// Every value is null, so no type could be inferred.
    Empty,
}

impl FieldKind {
    /// Anything but generic text. Booleans read as 0 / 1; an all-null
    /// field has no declared type and is rejected.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Real | FieldKind::Boolean)
    }

    /// Label for the field listing.
    pub fn display_name(self) -> &'static str {
        match self {
            FieldKind::Integer => "int64",
            FieldKind::Real => "float64",
            FieldKind::Boolean => "bool",
            FieldKind::Text => "object",
            FieldKind::Empty => "empty",
        }
    }

    /// Widen `self` so that it also admits `value`.
    pub fn merge(self, value: &AttributeValue) -> FieldKind {
        let incoming = match value {
            AttributeValue::Null => return self,
            AttributeValue::Bool(_) => FieldKind::Boolean,
            AttributeValue::Int(_) => FieldKind::Integer,
            AttributeValue::Float(_) => FieldKind::Real,
            AttributeValue::Text(_) => FieldKind::Text,
        };
        match (self, incoming) {
            (FieldKind::Empty, k) => k,
            (a, b) if a == b => a,
            (FieldKind::Integer, FieldKind::Real) | (FieldKind::Real, FieldKind::Integer) => FieldKind::Real,
            _ => FieldKind::Text,
        }
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Attribute field definition (name + declared type).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// One feature of a raw point table.
///
/// `attributes` is aligned with `PointTable::fields`.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub attributes: Vec<AttributeValue>,
}

/// A point-set file loaded into memory.
#[derive(Debug, Clone)]
pub struct PointTable {
    pub crs: Option<Crs>,
    pub fields: Vec<FieldDef>,
    pub features: Vec<Feature>,
}

impl PointTable {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A normalized edge sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    /// Longitudinal distance.
    pub m: f64,
    /// Scalar value (elevation, ...).
    pub z: f64,
    pub x: f64,
    pub y: f64,
}

/// One node of the interpolated surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRecord {
    /// Transverse index, `0..=i_div`.
    pub i: usize,
    pub x: f64,
    pub y: f64,
    pub m: f64,
    pub z: f64,
}

impl GridRecord {
    /// Point geometry `(x, y, z)`.
    pub fn point(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
