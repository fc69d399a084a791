//! `interpoint` library crate.
//!
//! Builds a regular 3-D point surface between two longitudinal edges: each
//! edge is densified along its distance field `m` at a fixed pitch, then the
//! nodes between matching samples are linearly interpolated across.
//!
//! The binary (`interpoint`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the pipeline can be driven from other tools

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
