//! Input/output helpers.
//!
//! - GeoJSON ingest into raw point tables (`ingest`)
//! - grid exports (GeoJSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
