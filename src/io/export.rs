//! Grid exports.
//!
//! - GeoJSON: the primary output. Each node is a `Point` feature with exactly
//!   the properties `i`, `m`, `z` (in that order) and geometry `[x, y, z]`.
//! - CSV: a flat `i,m,z,x,y` table for spreadsheets and scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;

use crate::domain::GridRecord;
use crate::error::AppError;
use crate::models::SurfaceGrid;

#[derive(Serialize)]
struct GridCsvRow {
    i: usize,
    m: f64,
    z: f64,
    x: f64,
    y: f64,
}

/// Legacy named `crs` member, kept as a foreign member of the collection.
fn crs_member(grid: &SurfaceGrid) -> Option<JsonObject> {
    let crs = grid.crs()?;
    let Some(name) = crs.geojson_name() else {
        warn!("CRS {crs} has no named form; writing GeoJSON without a crs member");
        return None;
    };
    let mut members = JsonObject::new();
    members.insert(
        "crs".to_string(),
        json!({ "type": "name", "properties": { "name": name } }),
    );
    Some(members)
}

fn grid_feature(r: &GridRecord) -> Feature {
    // Insertion order is the output order.
    let mut properties = JsonObject::new();
    properties.insert("i".to_string(), JsonValue::from(r.i as u64));
    properties.insert("m".to_string(), JsonValue::from(r.m));
    properties.insert("z".to_string(), JsonValue::from(r.z));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(r.point().to_vec()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Write the grid as a GeoJSON FeatureCollection (UTF-8).
pub fn write_grid_geojson(path: &Path, grid: &SurfaceGrid) -> Result<(), AppError> {
    let collection = FeatureCollection {
        bbox: None,
        features: grid.records().iter().map(grid_feature).collect(),
        foreign_members: crs_member(grid),
    };

    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create output '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)
        .map_err(|e| AppError::io(format!("Failed to write GeoJSON '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write GeoJSON '{}': {e}", path.display())))?;

    info!("wrote {} grid nodes to {}", grid.records().len(), path.display());
    Ok(())
}

/// Write the grid as CSV with header `i,m,z,x,y`.
pub fn write_grid_csv(path: &Path, grid: &SurfaceGrid) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for r in grid.records() {
        writer
            .serialize(GridCsvRow {
                i: r.i,
                m: r.m,
                z: r.z,
                x: r.x,
                y: r.y,
            })
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display())))?;

    info!("wrote grid CSV to {}", path.display());
    Ok(())
}
