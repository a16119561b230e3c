//! Problem data structures, solver settings and solve results.
//!
//! This module defines the canonical LP representation
//! and all associated types.

use std::fmt;

use crate::error::{PdhgError, ShapeError};
use crate::linalg::norm::DEFAULT_POWER_ITERS;
use crate::linalg::sparse::SparseOperator;

/// Linear program in canonical form.
///
/// ```text
/// minimize    c^T x
/// subject to  A x = b
///             lb <= x <= ub
/// ```
///
/// # Dimensions
///
/// - `n`: number of primal variables (length of c, lb, ub)
/// - `m`: number of equality constraints (length of b, rows of A)
///
/// Bounds may be infinite. `lb <= ub` is assumed and never checked.
#[derive(Debug, Clone)]
#[allow(non_snake_case)] // A is standard mathematical notation
pub struct ProblemData {
    /// Constraint operator A (m × n)
    pub A: SparseOperator,

    /// Equality right-hand side b (length m)
    pub b: Vec<f64>,

    /// Objective coefficients c (length n)
    pub c: Vec<f64>,

    /// Lower bounds lb (length n)
    pub lb: Vec<f64>,

    /// Upper bounds ub (length n)
    pub ub: Vec<f64>,
}

impl ProblemData {
    /// Assemble a problem, checking vector lengths against the operator.
    #[allow(non_snake_case)]
    pub fn new(
        A: SparseOperator,
        b: Vec<f64>,
        c: Vec<f64>,
        lb: Vec<f64>,
        ub: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        let (m, n) = (A.rows(), A.cols());
        for (name, actual, expected) in [
            ("b", b.len(), m),
            ("c", c.len(), n),
            ("lb", lb.len(), n),
            ("ub", ub.len(), n),
        ] {
            if actual != expected {
                return Err(ShapeError::DimensionMismatch { name, actual, expected });
            }
        }
        Ok(Self { A, b, c, lb, ub })
    }

    /// Assemble a problem straight from triplet arrays and shape `(m, n)`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_triplets(
        shape: (usize, usize),
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
        b: Vec<f64>,
        c: Vec<f64>,
        lb: Vec<f64>,
        ub: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        let a = SparseOperator::from_triplets(shape.0, shape.1, rows, cols, values)?;
        Self::new(a, b, c, lb, ub)
    }

    /// Get the number of primal variables (n)
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }

    /// Get the number of constraints (m)
    pub fn num_constraints(&self) -> usize {
        self.b.len()
    }

    /// Objective value c^T x.
    pub fn objective(&self, x: &[f64]) -> f64 {
        self.c.iter().zip(x).map(|(ci, xi)| ci * xi).sum()
    }

    /// Equality residual ‖Ax − b‖₂.
    pub fn primal_residual(&self, x: &[f64]) -> f64 {
        let mut r = self.b.clone();
        self.A.spmv(x, &mut r, 1.0, -1.0);
        r.iter().map(|&v| v * v).sum::<f64>().sqrt()
    }
}

/// Solver settings and parameters.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    /// Maximum number of PDHG iterations
    pub max_iter: usize,

    /// Relative change tolerance: stop when ‖x − x_old‖ ≤ tol · max(1, ‖x_old‖)
    pub tol: f64,

    /// Over-relaxation (extrapolation) parameter θ
    pub theta: f64,

    /// Power-iteration rounds used to estimate ‖A‖₂
    pub power_iters: usize,

    /// Seed for the power-iteration start vector (None = OS entropy)
    pub seed: Option<u64>,

    /// Time limit in milliseconds (None = no limit)
    pub time_limit_ms: Option<u64>,

    /// Enable periodic iteration logging
    pub verbose: bool,

    /// Log every N iterations when verbose
    pub log_every: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iter: 1_000_000,
            tol: 1e-8,
            theta: 1.0,
            power_iters: DEFAULT_POWER_ITERS,
            seed: None,
            time_limit_ms: None,
            verbose: false,
            log_every: 1000,
        }
    }
}

impl SolverSettings {
    /// Defaults with `PDHG_POWER_ITERS`, `PDHG_SEED` and `PDHG_LOG_EVERY`
    /// applied from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `PDHG_*` overrides looked up through `var`. Values that fail to
    /// parse are ignored.
    pub fn with_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Set PDHG_POWER_ITERS to trade norm accuracy for startup time
        if let Some(v) = var("PDHG_POWER_ITERS").and_then(|s| s.parse::<usize>().ok()) {
            self.power_iters = v;
        }

        // Pin the power-iteration start vector for reproducible runs
        if let Some(v) = var("PDHG_SEED").and_then(|s| s.parse::<u64>().ok()) {
            self.seed = Some(v);
        }

        if let Some(v) = var("PDHG_LOG_EVERY")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&v| v > 0)
        {
            self.log_every = v;
        }

        self
    }

    /// Reject settings the iteration cannot work with.
    pub fn validate(&self) -> Result<(), PdhgError> {
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(PdhgError::InvalidSettings(format!(
                "tol must be finite and non-negative, got {}",
                self.tol
            )));
        }
        if !self.theta.is_finite() {
            return Err(PdhgError::InvalidSettings(format!(
                "theta must be finite, got {}",
                self.theta
            )));
        }
        if self.power_iters == 0 {
            return Err(PdhgError::InvalidSettings(
                "power_iters must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Solution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Relative change fell below tolerance
    Converged,

    /// Maximum iterations reached without meeting the tolerance
    MaxIters,

    /// Time limit reached
    TimeLimit,

    /// Stopped by the iteration callback
    Interrupted,
}

impl SolveStatus {
    /// Whether the stopping rule was satisfied.
    pub fn is_converged(self) -> bool {
        matches!(self, SolveStatus::Converged)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "Converged"),
            SolveStatus::MaxIters => write!(f, "MaxIters"),
            SolveStatus::TimeLimit => write!(f, "Time Limit"),
            SolveStatus::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Solve result with solution and diagnostics.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solution status
    pub status: SolveStatus,

    /// Primal solution x (length n)
    pub x: Vec<f64>,

    /// Dual iterate y (length m)
    pub y: Vec<f64>,

    /// Objective value c^T x
    pub obj_val: f64,

    /// Detailed solve information and diagnostics
    pub info: SolveInfo,
}

/// Detailed solve information and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SolveInfo {
    /// Number of PDHG iterations completed
    pub iters: usize,

    /// Total solve time (milliseconds)
    pub solve_time_ms: u64,

    /// Time spent estimating ‖A‖₂ (milliseconds)
    pub norm_time_ms: u64,

    /// Time spent in the dual step (milliseconds)
    pub dual_time_ms: u64,

    /// Time spent in the primal step and projection (milliseconds)
    pub primal_time_ms: u64,

    /// Time spent in the stopping-rule check (milliseconds)
    pub termination_time_ms: u64,

    /// Estimated operator norm L
    pub op_norm: f64,

    /// Primal step size τ
    pub tau: f64,

    /// Dual step size σ
    pub sigma: f64,

    /// Last primal change ‖x − x_old‖₂
    pub step_norm: f64,

    /// Final equality residual ‖Ax − b‖₂
    pub primal_res: f64,
}
