//! Zero-crossing location for mode switches.

use hv_core::sign_change;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use crate::sim::{IntegratorType, advance};

/// A located switching event inside one step.
pub(crate) struct Crossing<S> {
    /// Sub-step from the step start to just past the crossing
    pub h: f64,
    /// State at `t + h`
    pub x: S,
}

/// Bisect the sub-step `h` so that `z` changes sign within `tol` of its end.
///
/// `z0` is the switching function at `(t, x)` and `x_end` the state after
/// the full step `h`, which is known to lie across the crossing.
#[allow(clippy::too_many_arguments)]
pub(crate) fn locate_crossing<M: TransientModel>(
    model: &mut M,
    integrator: IntegratorType,
    t: f64,
    x: &M::State,
    h: f64,
    x_end: M::State,
    z0: f64,
    tol: f64,
    max_iter: usize,
) -> SimResult<Crossing<M::State>> {
    let mut lo = 0.0;
    let mut hi = h;
    let mut x_hi = x_end;

    for _ in 0..max_iter {
        if hi - lo <= tol {
            return Ok(Crossing { h: hi, x: x_hi });
        }
        let mid = 0.5 * (lo + hi);
        let x_mid = advance(model, integrator, t, x, mid)?;
        let z_mid = model
            .switching_function(t + mid, &x_mid)?
            .ok_or(SimError::EventLocation {
                what: "switching function vanished during bisection",
                t: t + mid,
            })?;
        if sign_change(z0, z_mid) {
            hi = mid;
            x_hi = x_mid;
        } else {
            lo = mid;
        }
    }

    tracing::warn!(t, lo, hi, "event bisection hit iteration limit");
    Ok(Crossing { h: hi, x: x_hi })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x' = 1, switching at x = 0.3
    struct Clock;

    impl TransientModel for Clock {
        type State = f64;

        fn initial_state(&mut self) -> SimResult<f64> {
            Ok(0.0)
        }

        fn rhs(&mut self, _t: f64, _x: &f64) -> SimResult<f64> {
            Ok(1.0)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, s: f64) -> f64 {
            a * s
        }

        fn switching_function(&self, _t: f64, x: &f64) -> SimResult<Option<f64>> {
            Ok(Some(x - 0.3))
        }
    }

    #[test]
    fn crossing_lands_just_past_switch() {
        let mut m = Clock;
        let c = locate_crossing(&mut m, IntegratorType::RK4, 0.0, &0.0, 1.0, 1.0, -0.3, 1e-9, 100)
            .unwrap();
        assert!(c.h > 0.3 && c.h - 0.3 < 1e-8);
        assert!((c.x - c.h).abs() < 1e-12);
    }

    #[test]
    fn iteration_limit_returns_bracket_end() {
        let mut m = Clock;
        let c = locate_crossing(&mut m, IntegratorType::ForwardEuler, 0.0, &0.0, 1.0, 1.0, -0.3, 1e-12, 3)
            .unwrap();
        // three halvings: [0.25, 0.375]
        assert_eq!(c.h, 0.375);
    }
}
