//! Linear algebra layer.
//!
//! Sparse operator storage and the power-iteration norm estimate.

pub mod norm;
pub mod sparse;
