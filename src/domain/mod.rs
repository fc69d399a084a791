//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the coordinate reference system (`Crs`)
//! - raw point tables as read from disk (`PointTable`)
//! - normalized edge and grid records (`EdgeRecord`, `GridRecord`)

pub mod crs;
pub mod types;

pub use crs::*;
pub use types::*;
