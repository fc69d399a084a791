//! The interpolation core.
//!
//! - `EdgeSeries`: one edge, normalized and densified along `m`
//! - `SurfaceGrid`: transverse interpolation between two edges
//! - `validate`: cross-edge predicates and gates

pub mod edge;
pub mod grid;
pub mod validate;

pub use edge::*;
pub use grid::*;
pub use validate::*;
