//! pdhg-core: a vanilla primal-dual hybrid gradient LP solver
//!
//! Solves linear programs in canonical form
//!
//! ```text
//! minimize    c^T x
//! subject to  A x = b
//!             lb <= x <= ub
//! ```
//!
//! with the unpreconditioned Chambolle-Pock iteration. It is a transparent
//! reference implementation: no scaling, no restarts, no adaptive steps and
//! no infeasibility detection.
//!
//! # Algorithm
//!
//! - **Sparse operator**: A and Aᵀ in CSR form, so both products cost O(nnz)
//! - **Norm estimate**: power iteration on AᵀA gives L ≈ ‖A‖₂
//! - **Steps**: τ = σ = 1/L
//! - **Iteration**: dual ascent, primal gradient step, box projection,
//!   over-relaxation with parameter θ
//! - **Stopping**: ‖x − x_old‖ ≤ tol · max(1, ‖x_old‖)
//!
//! # Example
//!
//! ```
//! use pdhg_core::{solve, ProblemData, SolverSettings, SolveStatus};
//!
//! // min x s.t. x = 5, 0 <= x <= 10
//! let prob = ProblemData::from_triplets(
//!     (1, 1), &[0], &[0], &[1.0],
//!     vec![5.0], vec![1.0], vec![0.0], vec![10.0],
//! ).unwrap();
//!
//! let settings = SolverSettings { seed: Some(0), tol: 1e-10, ..Default::default() };
//! let result = solve(&prob, &settings).unwrap();
//!
//! assert_eq!(result.status, SolveStatus::Converged);
//! assert!((result.x[0] - 5.0).abs() < 1e-6);
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod pdhg;
pub mod problem;

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Re-export main types
pub use error::{PdhgError, PdhgResult, ShapeError};
pub use linalg::sparse::SparseOperator;
pub use pdhg::{solve_pdhg, IterationInfo, StepSizes};
pub use problem::{ProblemData, SolveInfo, SolveResult, SolveStatus, SolverSettings};

/// Main solve entry point.
///
/// Runs PDHG until the relative-change test passes or `max_iter` is reached.
/// Reaching the iteration cap is reported through [`SolveStatus::MaxIters`],
/// not as an error.
pub fn solve(problem: &ProblemData, settings: &SolverSettings) -> PdhgResult<SolveResult> {
    solve_with_callback(problem, settings, |_| ControlFlow::Continue(()))
}

/// Solve with a per-iteration hook that may stop the run early.
pub fn solve_with_callback<F>(
    problem: &ProblemData,
    settings: &SolverSettings,
    callback: F,
) -> PdhgResult<SolveResult>
where
    F: FnMut(&IterationInfo<'_>) -> ControlFlow<()>,
{
    let mut rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    solve_pdhg(problem, settings, &mut rng, callback)
}
