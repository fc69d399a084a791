//! GeoJSON ingest.
//!
//! Turns a GeoJSON `FeatureCollection` into a `PointTable`:
//! - the CRS comes from the top-level named `crs` member (if any)
//! - the field list is the union of property names in first-seen order
//! - each field's declared type is inferred from its non-null values
//!
//! No edge semantics live here; the table is handed to `EdgeSeries` as-is.

use std::fs;
use std::path::Path;

use geo_types::Geometry;
use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue};
use log::{debug, warn};

use crate::domain::{AttributeValue, Crs, Feature, FieldDef, FieldKind, PointTable};
use crate::error::AppError;

/// Load a GeoJSON point-set file.
pub fn load_point_table(path: &Path) -> Result<PointTable, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to open input '{}': {e}", path.display())))?;

    let table = parse_point_table(&text)
        .map_err(|e| AppError::new(e.kind(), format!("{}: {}", path.display(), e.message())))?;
    debug!(
        "loaded {}: {} features, {} fields, crs={}",
        path.display(),
        table.len(),
        table.fields.len(),
        table.crs.as_ref().map(|c| c.identifier()).unwrap_or_else(|| "undefined".to_string())
    );
    Ok(table)
}

/// Parse GeoJSON text (mainly for tests and piping).
pub fn parse_point_table(text: &str) -> Result<PointTable, AppError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| AppError::io(format!("Failed to parse GeoJSON: {e}")))?;
    match geojson {
        GeoJson::FeatureCollection(collection) => table_from_collection(collection),
        GeoJson::Feature(_) => Err(AppError::io("Expected a FeatureCollection, got `Feature`.")),
        GeoJson::Geometry(_) => Err(AppError::io("Expected a FeatureCollection, got a bare geometry.")),
    }
}

fn table_from_collection(collection: FeatureCollection) -> Result<PointTable, AppError> {
    if collection.features.is_empty() {
        return Err(AppError::invalid("Input contains no features."));
    }

    let crs = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
        .and_then(resolve_crs);

    // Field order follows first appearance across features.
    let mut names: Vec<String> = Vec::new();
    for feature in &collection.features {
        if let Some(props) = &feature.properties {
            for key in props.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }
    }

    let mut kinds = vec![FieldKind::Empty; names.len()];
    let mut features = Vec::with_capacity(collection.features.len());
    for (n, raw_feature) in collection.features.into_iter().enumerate() {
        let geometry = raw_feature
            .geometry
            .ok_or_else(|| AppError::io(format!("Feature {n} has no geometry.")))?;
        let geometry = Geometry::<f64>::try_from(geometry)
            .map_err(|e| AppError::io(format!("Feature {n}: {e}")))?;

        let props = raw_feature.properties.unwrap_or_default();
        let attributes: Vec<AttributeValue> = names
            .iter()
            .map(|name| props.get(name).map(attribute_value).unwrap_or(AttributeValue::Null))
            .collect();
        for (kind, value) in kinds.iter_mut().zip(&attributes) {
            *kind = kind.merge(value);
        }

        features.push(Feature { geometry, attributes });
    }

    let fields = names
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| FieldDef { name, kind })
        .collect();

    Ok(PointTable { crs, fields, features })
}

/// Resolve the legacy named `crs` member: `{"type": "name", "properties": {"name": ...}}`.
fn resolve_crs(member: &JsonValue) -> Option<Crs> {
    let kind = member.get("type").and_then(JsonValue::as_str).unwrap_or("");
    if kind != "name" {
        warn!("ignoring unsupported GeoJSON crs type `{kind}`");
        return None;
    }
    let name = member
        .get("properties")
        .and_then(JsonValue::as_object)
        .and_then(|props: &JsonObject| props.get("name"))
        .and_then(JsonValue::as_str);
    match name {
        Some(name) => Some(Crs::from_name(name)),
        None => {
            warn!("GeoJSON crs member has no `name` property");
            None
        }
    }
}

fn attribute_value(value: &JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => n.as_f64().map(AttributeValue::Float).unwrap_or(AttributeValue::Null),
        },
        JsonValue::String(s) => AttributeValue::Text(s.clone()),
        other => AttributeValue::Text(other.to_string()),
    }
}
