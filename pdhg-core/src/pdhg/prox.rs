//! Proximal operator of the box indicator.

/// Clamp `x` componentwise into `[lb, ub]`.
///
/// Computes `min(max(x, lb), ub)`: an inverted box (lb > ub) resolves to `ub`
/// instead of panicking like `f64::clamp`, and NaN entries stay NaN.
#[inline]
pub fn project_box(x: &mut [f64], lb: &[f64], ub: &[f64]) {
    debug_assert_eq!(x.len(), lb.len());
    debug_assert_eq!(x.len(), ub.len());
    for ((xi, &l), &u) in x.iter_mut().zip(lb).zip(ub) {
        if *xi < l {
            *xi = l;
        }
        if *xi > u {
            *xi = u;
        }
    }
}
