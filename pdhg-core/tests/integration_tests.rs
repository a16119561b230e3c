//! End-to-end integration tests for the PDHG solver.
//!
//! These tests run the full pipeline (operator, norm estimate, iteration,
//! stopping rule) on small LPs with known solutions.

use std::ops::ControlFlow;

use pdhg_core::{
    solve, solve_with_callback, PdhgError, ProblemData, SolveStatus, SolverSettings,
    SparseOperator,
};

fn settings(tol: f64) -> SolverSettings {
    SolverSettings {
        max_iter: 200_000,
        tol,
        theta: 1.0,
        power_iters: 10,
        seed: Some(12345),
        time_limit_ms: None,
        verbose: false,
        log_every: 1000,
    }
}

/// 2 supplies (3, 2) × 2 demands (4, 1), costs [1, 3; 2, 1].
///
/// Optimal shipment: x11 = 3, x12 = 0, x21 = 1, x22 = 1 with cost 6.
fn transportation(scale: f64) -> ProblemData {
    let rows = [0, 0, 1, 1, 2, 2, 3, 3];
    let cols = [0, 1, 2, 3, 0, 2, 1, 3];
    let a = SparseOperator::from_triplets(4, 4, &rows, &cols, &[1.0; 8])
        .unwrap()
        .scaled(scale);
    let b = [3.0, 2.0, 4.0, 1.0].iter().map(|v| v * scale).collect();
    ProblemData::new(
        a,
        b,
        vec![1.0, 3.0, 2.0, 1.0],
        vec![0.0; 4],
        vec![f64::INFINITY; 4],
    )
    .unwrap()
}

#[test]
fn test_scalar_equality() {
    // min x s.t. x = 5, 0 <= x <= 10
    let prob = ProblemData::from_triplets(
        (1, 1),
        &[0],
        &[0],
        &[1.0],
        vec![5.0],
        vec![1.0],
        vec![0.0],
        vec![10.0],
    )
    .unwrap();

    let result = solve(&prob, &settings(1e-6)).expect("Solve failed");

    println!("status={:?} iters={} x={:?}", result.status, result.info.iters, result.x);
    assert_eq!(result.status, SolveStatus::Converged);
    assert!((result.x[0] - 5.0).abs() < 1e-6, "x = {}", result.x[0]);
    assert!((result.obj_val - 5.0).abs() < 1e-6);
}

#[test]
fn test_scalar_equality_scaled() {
    // 2x = 10 has the same feasible point; L doubles and the steps halve
    let prob = ProblemData::from_triplets(
        (1, 1),
        &[0],
        &[0],
        &[2.0],
        vec![10.0],
        vec![1.0],
        vec![0.0],
        vec![10.0],
    )
    .unwrap();

    let result = solve(&prob, &settings(1e-8)).expect("Solve failed");

    assert_eq!(result.status, SolveStatus::Converged);
    assert!((result.info.op_norm - 2.0).abs() < 1e-9);
    assert!((result.info.tau - 0.5).abs() < 1e-9);
    assert!((result.x[0] - 5.0).abs() < 1e-6);
    assert!(result.info.primal_res < 1e-6);
}

#[test]
fn test_transportation_lp() {
    let prob = transportation(1.0);
    let result = solve(&prob, &settings(1e-9)).expect("Solve failed");

    println!(
        "status={:?} iters={} x={:?} obj={}",
        result.status, result.info.iters, result.x, result.obj_val
    );
    assert_eq!(result.status, SolveStatus::Converged);
    assert!((result.obj_val - 6.0).abs() < 1e-4, "obj = {}", result.obj_val);
    assert!(result.info.primal_res < 1e-4);
    for (xi, expected) in result.x.iter().zip([3.0, 0.0, 1.0, 1.0]) {
        assert!((xi - expected).abs() < 1e-4, "x = {:?}", result.x);
    }
}

#[test]
fn test_transportation_lp_doubled() {
    // A' = 2A, b' = 2b: same feasible set, solution must satisfy A'x = b'
    let prob = transportation(2.0);
    let result = solve(&prob, &settings(1e-9)).expect("Solve failed");

    assert_eq!(result.status, SolveStatus::Converged);
    let residual = prob.primal_residual(&result.x);
    assert!(residual < 1e-4, "||A'x - b'|| = {}", residual);
    assert!((result.obj_val - 6.0).abs() < 1e-4, "obj = {}", result.obj_val);
    assert!(result.info.op_norm > 3.9 && result.info.op_norm <= 4.0 + 1e-9);
}

#[test]
fn test_fixed_bounds_converge_immediately() {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..20 {
        let m = rng.gen_range(1..6);
        let n = rng.gen_range(1..8);
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        for i in 0..m {
            for j in 0..n {
                if rng.gen_bool(0.5) || j == i % n {
                    rows.push(i);
                    cols.push(j);
                    vals.push(rng.gen_range(-3.0..3.0));
                }
            }
        }
        let fixed: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let prob = ProblemData::from_triplets(
            (m, n),
            &rows,
            &cols,
            &vals,
            (0..m).map(|_| rng.gen_range(-5.0..5.0)).collect(),
            (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect(),
            fixed.clone(),
            fixed.clone(),
        )
        .unwrap();

        let result = solve(&prob, &settings(1e-8)).expect("Solve failed");

        assert_eq!(result.status, SolveStatus::Converged);
        assert!(result.info.iters <= 2, "iters = {}", result.info.iters);
        assert_eq!(result.x, fixed);
    }
}

#[test]
fn test_zero_matrix_is_degenerate() {
    let prob = ProblemData::from_triplets(
        (3, 2),
        &[],
        &[],
        &[],
        vec![1.0, 2.0, 3.0],
        vec![1.0, -1.0],
        vec![0.0; 2],
        vec![1.0; 2],
    )
    .unwrap();

    let err = solve(&prob, &settings(1e-8)).unwrap_err();
    assert_eq!(err, PdhgError::DegenerateNorm { norm: 0.0 });
}

#[test]
fn test_max_iters_returns_iterate() {
    let prob = transportation(1.0);
    let s = SolverSettings { max_iter: 5, ..settings(1e-12) };
    let result = solve(&prob, &s).expect("Solve failed");

    assert_eq!(result.status, SolveStatus::MaxIters);
    assert_eq!(result.info.iters, 5);
    assert_eq!(result.x.len(), 4);
    assert!(result.x.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
fn test_seeded_runs_are_identical() {
    let prob = transportation(1.0);
    let a = solve(&prob, &settings(1e-9)).unwrap();
    let b = solve(&prob, &settings(1e-9)).unwrap();

    assert_eq!(a.info.op_norm, b.info.op_norm);
    assert_eq!(a.info.iters, b.info.iters);
    assert_eq!(a.x, b.x);
}

#[test]
fn test_callback_sees_every_iteration() {
    let prob = transportation(1.0);
    let mut count = 0;
    let result = solve_with_callback(&prob, &settings(1e-9), |info| {
        count += 1;
        assert_eq!(info.iter, count);
        assert_eq!(info.x.len(), 4);
        ControlFlow::Continue(())
    })
    .unwrap();

    assert_eq!(result.status, SolveStatus::Converged);
    // The converging iteration does not reach the callback
    assert_eq!(count + 1, result.info.iters);
}

#[test]
fn test_concurrent_solves_share_problem() {
    let prob = transportation(1.0);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                let prob = &prob;
                scope.spawn(move || {
                    let s = SolverSettings { seed: Some(seed), ..settings(1e-9) };
                    solve(prob, &s).expect("Solve failed")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result.status, SolveStatus::Converged);
        assert!((result.obj_val - 6.0).abs() < 1e-4);
    }
}
