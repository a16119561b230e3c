//! Error types for the PDHG solver.

use thiserror::Error;

/// Structural errors raised while building the constraint operator or the
/// problem instance.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// The row, column and value triplet arrays have different lengths
    #[error("Triplet arrays differ in length: rows={rows}, cols={cols}, values={values}")]
    TripletLengthMismatch {
        rows: usize,
        cols: usize,
        values: usize,
    },

    /// A triplet index falls outside the declared matrix shape
    #[error("Triplet {index} at ({row}, {col}) is outside a {nrows}×{ncols} matrix")]
    IndexOutOfBounds {
        index: usize,
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    /// A problem vector does not match the operator dimensions
    #[error("{name} has length {actual}, expected {expected}")]
    DimensionMismatch {
        name: &'static str,
        actual: usize,
        expected: usize,
    },
}

/// Errors that abort a solve before any iterate is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdhgError {
    /// Problem data is structurally invalid
    #[error("Invalid problem shape: {0}")]
    Shape(#[from] ShapeError),

    /// The estimated operator norm cannot be turned into step sizes
    #[error("Degenerate operator norm estimate {norm} (step sizes 1/L are undefined)")]
    DegenerateNorm { norm: f64 },

    /// Solver settings are out of range
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for PDHG operations.
pub type PdhgResult<T> = Result<T, PdhgError>;
