//! Scoped wall-clock timers for the phases of a solve.

use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone)]
pub enum PerfSection {
    NormEstimate,
    DualStep,
    PrimalStep,
    Termination,
}

#[derive(Debug, Default, Clone)]
pub struct PerfTimers {
    pub norm_estimate: Duration,
    pub dual_step: Duration,
    pub primal_step: Duration,
    pub termination: Duration,
}

impl PerfTimers {
    pub fn scoped(&mut self, section: PerfSection) -> PerfGuard<'_> {
        PerfGuard { section, start: Instant::now(), timers: self }
    }

    pub fn add(&mut self, section: PerfSection, dt: Duration) {
        match section {
            PerfSection::NormEstimate => self.norm_estimate += dt,
            PerfSection::DualStep => self.dual_step += dt,
            PerfSection::PrimalStep => self.primal_step += dt,
            PerfSection::Termination => self.termination += dt,
        }
    }
}

pub struct PerfGuard<'a> {
    section: PerfSection,
    start: Instant,
    timers: &'a mut PerfTimers,
}

impl Drop for PerfGuard<'_> {
    fn drop(&mut self) {
        self.timers.add(self.section, self.start.elapsed());
    }
}
