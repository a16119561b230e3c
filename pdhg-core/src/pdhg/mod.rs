//! Primal-dual hybrid gradient (Chambolle-Pock) engine.
//!
//! One solve owns a [`PdhgState`] for its whole lifetime; the problem data is
//! only borrowed, so concurrent solves can share a single [`ProblemData`].
//!
//! [`ProblemData`]: crate::problem::ProblemData

pub mod perf;
pub mod prox;
pub mod solve;
pub mod state;
pub mod step;
pub mod termination;

pub use perf::{PerfSection, PerfTimers};
pub use prox::project_box;
pub use solve::{solve_pdhg, IterationInfo};
pub use state::PdhgState;
pub use step::StepSizes;
pub use termination::{check_termination, TerminationCriteria};
