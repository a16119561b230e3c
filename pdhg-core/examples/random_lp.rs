//! Timing runs of PDHG on random feasible box-constrained LPs.
//!
//! Run with `cargo run --release --example random_lp`.

use std::time::Instant;

use pdhg_core::{solve, ProblemData, SolveResult, SolverSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random instance of `min c^T x s.t. Ax = b, 0 <= x <= 10`.
///
/// Every row gets at least one positive entry and `b = A x_feas` for a point
/// strictly inside the box, so the instance is always feasible.
fn random_feasible_lp(m: usize, n: usize, density: f64, seed: u64) -> ProblemData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    for i in 0..m {
        let anchor = rng.gen_range(0..n);
        for j in 0..n {
            if j == anchor {
                rows.push(i);
                cols.push(j);
                vals.push(rng.gen_range(0.5..1.5));
            } else if rng.gen_bool(density) {
                rows.push(i);
                cols.push(j);
                vals.push(rng.gen_range(-1.0..1.0));
            }
        }
    }

    let x_feas: Vec<f64> = (0..n).map(|_| rng.gen_range(1.0..9.0)).collect();
    let mut b = vec![0.0; m];
    for ((&i, &j), &v) in rows.iter().zip(&cols).zip(&vals) {
        b[i] += v * x_feas[j];
    }
    let c = (0..n).map(|_| rng.gen_range(0.1..1.1)).collect();

    ProblemData::from_triplets((m, n), &rows, &cols, &vals, b, c, vec![0.0; n], vec![10.0; n])
        .expect("generated triplets are in range")
}

fn report_row(m: usize, n: usize, prob: &ProblemData, res: &SolveResult, secs: f64) {
    let per_iter_us = secs * 1e6 / res.info.iters.max(1) as f64;
    println!(
        "{:>6} {:>6} {:>8} {:>11} {:>8} {:>13.6e} {:>10.2e} {:>9.1} {:>8.2}",
        m,
        n,
        prob.A.nnz(),
        res.status.to_string(),
        res.info.iters,
        res.obj_val,
        res.info.primal_res,
        secs * 1e3,
        per_iter_us,
    );
}

fn main() {
    let settings = SolverSettings {
        max_iter: 100_000,
        tol: 1e-7,
        theta: 1.0,
        power_iters: 10,
        seed: Some(7),
        time_limit_ms: None,
        verbose: false,
        log_every: 1000,
    };

    println!(
        "{:>6} {:>6} {:>8} {:>11} {:>8} {:>13} {:>10} {:>9} {:>8}",
        "m", "n", "nnz", "status", "iters", "objective", "|Ax-b|", "ms", "us/iter"
    );

    for (m, n, density) in [(50, 100, 0.3), (200, 500, 0.1), (500, 1000, 0.05)] {
        let prob = random_feasible_lp(m, n, density, (m * n) as u64);

        let start = Instant::now();
        match solve(&prob, &settings) {
            Ok(res) => report_row(m, n, &prob, &res, start.elapsed().as_secs_f64()),
            Err(e) => println!("{:>6} {:>6} failed: {}", m, n, e),
        }
    }
}
