//! Small transportation LP solved with PDHG.
//!
//! Two warehouses (supply 3 and 2) ship to two stores (demand 4 and 1):
//!
//!   minimize    x11 + 3 x12 + 2 x21 + x22
//!   subject to  x11 + x12 = 3,  x21 + x22 = 2
//!               x11 + x21 = 4,  x12 + x22 = 1
//!               x >= 0
//!
//! Optimal solution: x = [3, 0, 1, 1], objective = 6

use pdhg_core::{solve, ProblemData, SolverSettings};

fn main() {
    println!("PDHG - Transportation LP Example");
    println!("================================");

    let prob = ProblemData::from_triplets(
        (4, 4),
        &[0, 0, 1, 1, 2, 2, 3, 3],
        &[0, 1, 2, 3, 0, 2, 1, 3],
        &[1.0; 8],
        vec![3.0, 2.0, 4.0, 1.0],
        vec![1.0, 3.0, 2.0, 1.0],
        vec![0.0; 4],
        vec![f64::INFINITY; 4],
    )
    .expect("valid problem");

    let settings = SolverSettings {
        tol: 1e-9,
        seed: Some(0),
        ..Default::default()
    };

    match solve(&prob, &settings) {
        Ok(result) => {
            println!("Status:      {}", result.status);
            println!("Iterations:  {}", result.info.iters);
            println!("||A||_2 ~    {:.6}", result.info.op_norm);
            println!("Objective:   {:.6}", result.obj_val);
            println!("|Ax - b|:    {:.3e}", result.info.primal_res);
            println!("x = {:?}", result.x);
        }
        Err(e) => println!("ERROR: {}", e),
    }
}
