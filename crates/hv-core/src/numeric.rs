/// Floating point type used throughout the workspace
pub type Real = f64;

/// Floor applied to start extents so the liquid state stays strictly positive.
pub const EXTENT_EPS: Real = f64::EPSILON;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// True when `a` and `b` are finite and have strictly opposite signs.
pub fn sign_change(a: Real, b: Real) -> bool {
    (a > 0.0 && b <= 0.0) || (a <= 0.0 && b > 0.0)
}
