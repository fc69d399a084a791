//! Numerical building blocks: piecewise-linear interpolation and sampling.

pub mod interp;
pub mod sampling;

pub use interp::*;
pub use sampling::*;
