//! Step sizes derived from the operator-norm estimate.

use crate::error::PdhgError;

/// Primal (τ) and dual (σ) step lengths.
///
/// Chosen as τ = σ = 1/L, the boundary case of τσL² ≤ 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizes {
    pub tau: f64,
    pub sigma: f64,
}

impl StepSizes {
    /// Derive step sizes from an estimate L of ‖A‖₂.
    ///
    /// Zero, negative or non-finite L gives [`PdhgError::DegenerateNorm`].
    pub fn from_norm(norm: f64) -> Result<Self, PdhgError> {
        if !norm.is_finite() || norm <= 0.0 {
            return Err(PdhgError::DegenerateNorm { norm });
        }
        let inv = 1.0 / norm;
        Ok(Self { tau: inv, sigma: inv })
    }
}
