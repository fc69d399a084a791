//! Reporting utilities: field listings and run summaries.

pub mod format;

pub use format::*;
