//! Main PDHG loop.
//!
//! Solves `min c^T x + I_{lb<=x<=ub}(x) + I_{Ax=b}(x)` with the unpreconditioned
//! Chambolle-Pock iteration:
//!
//! ```text
//! y     ← y + σ (A x̄ − b)
//! x_old ← x
//! x     ← proj_[lb,ub](x − τ (Aᵀy + c))
//! x̄     ← x + θ (x − x_old)
//! ```
//!
//! with τ = σ = 1/L and L the power-iteration estimate of ‖A‖₂.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::error::PdhgResult;
use crate::linalg::norm::estimate_operator_norm;
use crate::pdhg::{
    check_termination, project_box, PdhgState, PerfSection, PerfTimers, StepSizes,
    TerminationCriteria,
};
use crate::problem::{ProblemData, SolveInfo, SolveResult, SolveStatus, SolverSettings};

/// Snapshot handed to the iteration callback.
#[derive(Debug, Clone, Copy)]
pub struct IterationInfo<'a> {
    /// Iterations completed so far (1-based)
    pub iter: usize,

    /// Current primal iterate
    pub x: &'a [f64],

    /// Current dual iterate
    pub y: &'a [f64],
}

/// Run PDHG with an injected random source for the norm estimate.
///
/// `callback` runs after every iteration that did not meet the stopping rule;
/// returning `ControlFlow::Break(())` ends the solve with
/// [`SolveStatus::Interrupted`].
pub fn solve_pdhg<R, F>(
    prob: &ProblemData,
    settings: &SolverSettings,
    rng: &mut R,
    mut callback: F,
) -> PdhgResult<SolveResult>
where
    R: Rng + ?Sized,
    F: FnMut(&IterationInfo<'_>) -> ControlFlow<()>,
{
    settings.validate()?;

    let n = prob.num_vars();
    let m = prob.num_constraints();
    let start = Instant::now();
    let mut timers = PerfTimers::default();

    let op_norm = {
        let _g = timers.scoped(PerfSection::NormEstimate);
        estimate_operator_norm(&prob.A, settings.power_iters, rng)
    };
    let StepSizes { tau, sigma } = StepSizes::from_norm(op_norm)?;

    if settings.verbose {
        log::info!(
            "pdhg: n={} m={} nnz={} ||A||~{:.6e} tau=sigma={:.6e} theta={} tol={:.1e}",
            n,
            m,
            prob.A.nnz(),
            op_norm,
            tau,
            settings.theta,
            settings.tol,
        );
    }

    let criteria = TerminationCriteria {
        tol: settings.tol,
        max_iter: settings.max_iter,
    };
    let time_limit = settings.time_limit_ms.map(Duration::from_millis);
    let log_every = settings.log_every.max(1);

    let mut state = PdhgState::new(n, m);
    let mut status = SolveStatus::MaxIters;
    let mut iters = 0;

    for k in 0..settings.max_iter {
        {
            let _g = timers.scoped(PerfSection::DualStep);
            // y += σ (A x̄ − b)
            state.dual_res.copy_from_slice(&prob.b);
            prob.A.spmv(&state.x_bar, &mut state.dual_res, 1.0, -1.0);
            for (yi, &ri) in state.y.iter_mut().zip(&state.dual_res) {
                *yi += sigma * ri;
            }
        }

        {
            let _g = timers.scoped(PerfSection::PrimalStep);
            // grad = Aᵀy + c
            state.grad.copy_from_slice(&prob.c);
            prob.A.spmv_transpose(&state.y, &mut state.grad, 1.0, 1.0);

            state.x_old.copy_from_slice(&state.x);
            for (xi, &gi) in state.x.iter_mut().zip(&state.grad) {
                *xi -= tau * gi;
            }
            project_box(&mut state.x, &prob.lb, &prob.ub);
            state.extrapolate(settings.theta);
        }

        iters = k + 1;
        let stop = {
            let _g = timers.scoped(PerfSection::Termination);
            check_termination(k, &state.x, &state.x_old, &criteria)
        };

        if settings.verbose && iters % log_every == 0 {
            log::debug!(
                "iter {:>8}: obj={:.6e} |dx|={:.3e} |Ax-b|={:.3e}",
                iters,
                prob.objective(&state.x),
                state.step_norm(),
                prob.primal_residual(&state.x),
            );
        }

        if let Some(s) = stop {
            status = s;
            break;
        }

        let info = IterationInfo { iter: iters, x: &state.x, y: &state.y };
        if callback(&info).is_break() {
            status = SolveStatus::Interrupted;
            break;
        }

        if let Some(limit) = time_limit {
            if start.elapsed() >= limit {
                status = SolveStatus::TimeLimit;
                break;
            }
        }
    }

    match status {
        SolveStatus::Converged => log::info!("PDHG converged in {} iterations", iters),
        SolveStatus::MaxIters => log::warn!(
            "PDHG reached max_iter={} without full convergence",
            settings.max_iter
        ),
        SolveStatus::TimeLimit => log::warn!("PDHG hit the time limit after {} iterations", iters),
        SolveStatus::Interrupted => log::info!("PDHG interrupted after {} iterations", iters),
    }

    let step_norm = state.step_norm();
    let (x, y) = state.into_iterates();
    let obj_val = prob.objective(&x);
    let primal_res = prob.primal_residual(&x);

    Ok(SolveResult {
        status,
        obj_val,
        info: SolveInfo {
            iters,
            solve_time_ms: start.elapsed().as_millis() as u64,
            norm_time_ms: timers.norm_estimate.as_millis() as u64,
            dual_time_ms: timers.dual_step.as_millis() as u64,
            primal_time_ms: timers.primal_step.as_millis() as u64,
            termination_time_ms: timers.termination.as_millis() as u64,
            op_norm,
            tau,
            sigma,
            step_norm,
            primal_res,
        },
        x,
        y,
    })
}
