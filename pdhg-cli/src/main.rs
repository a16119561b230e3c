//! Command-line driver for the PDHG LP solver.
//!
//! Usage:
//!   pdhg --npz problem.npz [--max_iter 1000000] [--tol 1e-8] [--theta 1.0]

mod npy;
mod npz;
mod report;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use pdhg_core::{solve, SolveStatus, SolverSettings};

use crate::npy::write_npy_f64;
use crate::npz::load_canonical_npz;
use crate::report::SolveSummary;

#[derive(Parser, Debug)]
#[command(name = "pdhg", about = "Vanilla PDHG solver for canonical-form LPs")]
struct Cli {
    /// Path to the .npz archive with A_row, A_col, A_data, A_shape, b, c, lb, ub.
    #[arg(long)]
    npz: PathBuf,

    /// Maximum PDHG iterations.
    #[arg(long = "max_iter", visible_alias = "max-iter", default_value_t = 1_000_000)]
    max_iter: usize,

    /// Relative change tolerance for stopping.
    #[arg(long, default_value_t = 1e-8)]
    tol: f64,

    /// Over-relaxation parameter.
    #[arg(long, default_value_t = 1.0)]
    theta: f64,

    /// Where to write the solution vector (.npy).
    #[arg(long, default_value = "pdhg_solution.npy")]
    output: PathBuf,

    /// Seed for the norm-estimate start vector (default: PDHG_SEED or random).
    #[arg(long)]
    seed: Option<u64>,

    /// Power-iteration rounds for the norm estimate (default: PDHG_POWER_ITERS or 10).
    #[arg(long = "power_iters", visible_alias = "power-iters")]
    power_iters: Option<usize>,

    /// Wall-clock limit in milliseconds.
    #[arg(long = "time_limit_ms", visible_alias = "time-limit-ms")]
    time_limit_ms: Option<u64>,

    /// Write a JSON solve summary to this path.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log iteration progress.
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> SolverSettings {
        let defaults = SolverSettings::from_env();
        SolverSettings {
            max_iter: self.max_iter,
            tol: self.tol,
            theta: self.theta,
            power_iters: self.power_iters.unwrap_or(defaults.power_iters),
            seed: self.seed.or(defaults.seed),
            time_limit_ms: self.time_limit_ms,
            verbose: self.verbose,
            ..defaults
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let prob = load_canonical_npz(&cli.npz)?;
    let settings = cli.settings();

    let start = Instant::now();
    let result = solve(&prob, &settings).context("PDHG solve failed")?;
    log::debug!("solve finished in {:.3} s", start.elapsed().as_secs_f64());

    match result.status {
        SolveStatus::Converged => println!("PDHG converged in {} iterations", result.info.iters),
        SolveStatus::MaxIters => println!(
            "PDHG reached max_iter={} without full convergence",
            settings.max_iter
        ),
        SolveStatus::TimeLimit => println!(
            "PDHG hit the time limit after {} iterations without full convergence",
            result.info.iters
        ),
        SolveStatus::Interrupted => println!("PDHG interrupted after {} iterations", result.info.iters),
    }

    println!("Optimal objective value: {}", result.obj_val);
    println!("Solution x: {:?}", result.x);

    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create solution file: {:?}", cli.output))?;
    write_npy_f64(BufWriter::new(file), &result.x)
        .with_context(|| format!("Failed to write solution to {:?}", cli.output))?;

    if let Some(path) = &cli.summary {
        SolveSummary::new(&prob, &result).write_json(path)?;
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
