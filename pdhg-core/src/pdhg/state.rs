//! Per-solve iteration state.

/// PDHG iterates and scratch buffers.
///
/// Created with x = x̄ = 0, y = 0 and mutated in place; the hot loop never
/// allocates.
#[derive(Debug, Clone)]
pub struct PdhgState {
    /// Primal iterate x (length n)
    pub x: Vec<f64>,

    /// Extrapolated primal x̄ (length n)
    pub x_bar: Vec<f64>,

    /// Dual iterate y (length m)
    pub y: Vec<f64>,

    /// Snapshot of x before the primal step (length n)
    pub x_old: Vec<f64>,

    // Scratch: A x̄ − b and Aᵀy + c
    pub dual_res: Vec<f64>,
    pub grad: Vec<f64>,
}

impl PdhgState {
    /// Create a zero-initialized state for an m × n problem.
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![0.0; n],
            x_bar: vec![0.0; n],
            y: vec![0.0; m],
            x_old: vec![0.0; n],
            dual_res: vec![0.0; m],
            grad: vec![0.0; n],
        }
    }

    /// x̄ ← x + θ (x − x_old)
    pub fn extrapolate(&mut self, theta: f64) {
        for ((xb, &xi), &xo) in self.x_bar.iter_mut().zip(&self.x).zip(&self.x_old) {
            *xb = xi + theta * (xi - xo);
        }
    }

    /// ‖x − x_old‖₂
    pub fn step_norm(&self) -> f64 {
        self.x
            .iter()
            .zip(&self.x_old)
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Consume the state, keeping only the primal and dual iterates.
    pub fn into_iterates(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}
