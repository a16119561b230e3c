//! Machine-readable solve summary.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use pdhg_core::{ProblemData, SolveResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveSummary {
    pub status: String,
    pub converged: bool,
    pub iterations: usize,
    pub objective: f64,
    pub num_vars: usize,
    pub num_constraints: usize,
    pub nnz: usize,
    pub op_norm: f64,
    pub tau: f64,
    pub sigma: f64,
    pub step_norm: f64,
    pub primal_residual: f64,
    pub solve_time_ms: u64,
    pub norm_time_ms: u64,
    pub dual_time_ms: u64,
    pub primal_time_ms: u64,
    pub termination_time_ms: u64,
}

impl SolveSummary {
    pub fn new(prob: &ProblemData, result: &SolveResult) -> Self {
        let info = &result.info;
        Self {
            status: result.status.to_string(),
            converged: result.status.is_converged(),
            iterations: info.iters,
            objective: result.obj_val,
            num_vars: prob.num_vars(),
            num_constraints: prob.num_constraints(),
            nnz: prob.A.nnz(),
            op_norm: info.op_norm,
            tau: info.tau,
            sigma: info.sigma,
            step_norm: info.step_norm,
            primal_residual: info.primal_res,
            solve_time_ms: info.solve_time_ms,
            norm_time_ms: info.norm_time_ms,
            dual_time_ms: info.dual_time_ms,
            primal_time_ms: info.primal_time_ms,
            termination_time_ms: info.termination_time_ms,
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create summary file: {:?}", path.as_ref()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to serialize solve summary")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdhg_core::{solve, SolverSettings};

    #[test]
    fn test_summary_json() {
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
        let settings = SolverSettings { seed: Some(0), ..Default::default() };
        let result = solve(&prob, &settings).unwrap();
        let summary = SolveSummary::new(&prob, &result);

        assert_eq!(summary.status, "Converged");
        assert!(summary.converged);
        assert_eq!(summary.nnz, 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        summary.write_json(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: SolveSummary = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.status, summary.status);
        assert_eq!(parsed.iterations, summary.iterations);
        assert!((parsed.objective - summary.objective).abs() < 1e-12);
        assert!((parsed.op_norm - 1.0).abs() < 1e-12);
    }
}
