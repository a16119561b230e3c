//! Stopping rule for the PDHG loop.
//!
//! The iteration stops once the primal iterate stops moving:
//!
//! ```text
//! ‖x − x_old‖₂ ≤ tol · max(1, ‖x_old‖₂)
//! ```
//!
//! There is no optimality certificate; a converged x need not satisfy Ax = b.

use crate::linalg::norm::norm2;
use crate::problem::SolveStatus;

/// Termination criteria.
#[derive(Debug, Clone)]
pub struct TerminationCriteria {
    /// Relative change tolerance
    pub tol: f64,

    /// Maximum iterations
    pub max_iter: usize,
}

/// Check termination after the iteration with 0-based index `iter`.
///
/// Returns `Some(status)` if the solver should stop, `None` otherwise. The
/// iteration count to report is always `iter + 1`.
pub fn check_termination(
    iter: usize,
    x: &[f64],
    x_old: &[f64],
    criteria: &TerminationCriteria,
) -> Option<SolveStatus> {
    let delta = x
        .iter()
        .zip(x_old)
        .map(|(&a, &b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt();
    let reference = norm2(x_old).max(1.0);

    if delta <= criteria.tol * reference {
        return Some(SolveStatus::Converged);
    }

    if iter + 1 >= criteria.max_iter {
        return Some(SolveStatus::MaxIters);
    }

    None
}
