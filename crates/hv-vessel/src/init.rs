//! Initialization policy for the liquid state.
//!
//! Evaluated once at t = 0 and inert afterwards:
//! - `FixedInitial`: the extent (and the cushion charge) is pinned to its
//!   start value, floored to a small positive epsilon.
//! - `SteadyStateInitial`: d(extent)/dt = 0 is pinned instead; the extent
//!   is solved for.
//! - `Free`: start values are taken as given and only validated.

use crate::error::{VesselError, VesselResult};
use hv_core::EXTENT_EPS;

const MAX_ITER: usize = 200;
/// Candidate extents sampled when bracketing the steady state.
const SCAN_POINTS: usize = 64;
/// Rate tolerance relative to capacity [1/s].
const RATE_TOL_REL: f64 = 1e-12;

/// Initial closure applied to the liquid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationPolicy {
    #[default]
    FixedInitial,
    SteadyStateInitial,
    Free,
}

impl InitializationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitializationPolicy::FixedInitial => "FixedInitial",
            InitializationPolicy::SteadyStateInitial => "SteadyStateInitial",
            InitializationPolicy::Free => "Free",
        }
    }
}

/// Start values and the policy that decides how they are used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    pub policy: InitializationPolicy,
    /// Start level [m] or liquid volume [m³]
    pub extent_start: f64,
}

impl InitialConditions {
    pub fn fixed(extent_start: f64) -> Self {
        Self {
            policy: InitializationPolicy::FixedInitial,
            extent_start,
        }
    }

    /// Start extent with the epsilon floor applied.
    pub fn floored_start(&self) -> f64 {
        self.extent_start.max(EXTENT_EPS)
    }
}

/// Resolve the extent at t = 0.
///
/// `[lo, hi]` is the admissible search interval for the steady-state solve
/// and `rate` evaluates d(extent)/dt for a candidate extent.
pub fn resolve_extent<F>(
    init: &InitialConditions,
    lo: f64,
    hi: f64,
    mut rate: F,
) -> VesselResult<f64>
where
    F: FnMut(f64) -> VesselResult<f64>,
{
    match init.policy {
        InitializationPolicy::Free => Ok(init.extent_start),
        InitializationPolicy::FixedInitial => {
            let x = init.floored_start();
            if x != init.extent_start {
                tracing::debug!(
                    start = init.extent_start,
                    floored = x,
                    "start extent floored to epsilon"
                );
            }
            Ok(x)
        }
        InitializationPolicy::SteadyStateInitial => {
            let tol = RATE_TOL_REL * hi.abs().max(f64::MIN_POSITIVE);
            let x0 = init.floored_start().clamp(lo, hi);
            let r0 = rate(x0)?;
            if r0.abs() <= tol {
                return Ok(x0);
            }
            let (a, b) = bracket_steady_extent(lo, hi, tol, (x0, r0), &mut rate)?;
            if b.1.abs() <= tol {
                return Ok(b.0);
            }
            bisect_steady_extent(a, b, tol, &mut rate)
        }
    }
}

/// Scan `[lo, hi]` for the sign change of the rate nearest to the start.
///
/// Candidates where the rate cannot be evaluated (for example a cushion
/// squeezed past its equation-of-state envelope) are skipped; a bracket
/// never spans one.
fn bracket_steady_extent<F>(
    lo: f64,
    hi: f64,
    tol: f64,
    start: (f64, f64),
    rate: &mut F,
) -> VesselResult<((f64, f64), (f64, f64))>
where
    F: FnMut(f64) -> VesselResult<f64>,
{
    let mut xs: Vec<f64> = (0..=SCAN_POINTS)
        .map(|i| lo + (hi - lo) * i as f64 / SCAN_POINTS as f64)
        .filter(|&x| x != start.0)
        .collect();
    let pos = xs.partition_point(|&x| x < start.0);
    xs.insert(pos, start.0);

    let mut samples = Vec::with_capacity(xs.len());
    for &x in &xs {
        let r = if x == start.0 {
            Some(start.1)
        } else {
            match rate(x) {
                Ok(r) if r.abs() <= tol => return Ok(((x, r), (x, r))),
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::debug!(extent = x, error = %e, "steady-state scan skips candidate");
                    None
                }
            }
        };
        samples.push((x, r));
    }

    let best = samples
        .windows(2)
        .filter_map(|w| match (w[0], w[1]) {
            ((xa, Some(ra)), (xb, Some(rb))) if (ra > 0.0) != (rb > 0.0) => {
                Some(((xa, ra), (xb, rb)))
            }
            _ => None,
        })
        .min_by(|a, b| {
            let da = (0.5 * (a.0.0 + a.1.0) - start.0).abs();
            let db = (0.5 * (b.0.0 + b.1.0) - start.0).abs();
            da.total_cmp(&db)
        });

    best.ok_or_else(|| VesselError::InitializationFailed {
        what: format!(
            "no steady extent in [{lo:e}, {hi:e}]: net rate never changes sign \
             ({:e} at start {:e})",
            start.1, start.0
        ),
    })
}

/// Bisection for d(extent)/dt = 0 inside a sign-changing bracket.
fn bisect_steady_extent<F>(
    a: (f64, f64),
    b: (f64, f64),
    tol: f64,
    rate: &mut F,
) -> VesselResult<f64>
where
    F: FnMut(f64) -> VesselResult<f64>,
{
    let (mut lo, r_lo) = a;
    let (mut hi, _) = b;
    let lo_positive = r_lo > 0.0;
    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let r_mid = rate(mid)?;
        if r_mid.abs() <= tol || (hi - lo) <= f64::EPSILON * hi.abs() {
            tracing::debug!(extent = mid, rate = r_mid, "steady-state extent found");
            return Ok(mid);
        }
        if (r_mid > 0.0) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    tracing::warn!(lo, hi, "steady-state bisection hit iteration limit");
    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(policy: InitializationPolicy, x: f64) -> InitialConditions {
        InitialConditions {
            policy,
            extent_start: x,
        }
    }

    #[test]
    fn fixed_initial_reproduces_start() {
        let x = resolve_extent(&init(InitializationPolicy::FixedInitial, 0.5), 0.0, 1.0, |_| {
            Ok(1.0)
        })
        .unwrap();
        assert_eq!(x, 0.5);
    }

    #[test]
    fn fixed_initial_floors_zero_start() {
        let x = resolve_extent(&init(InitializationPolicy::FixedInitial, 0.0), 0.0, 1.0, |_| {
            Ok(0.0)
        })
        .unwrap();
        assert_eq!(x, EXTENT_EPS);
    }

    #[test]
    fn free_keeps_start_unfloored() {
        let x =
            resolve_extent(&init(InitializationPolicy::Free, 0.0), 0.0, 1.0, |_| Ok(3.0)).unwrap();
        assert_eq!(x, 0.0);
    }

    #[test]
    fn steady_state_solves_for_zero_rate() {
        // inflow falls linearly with level, balanced at 0.3
        let x = resolve_extent(
            &init(InitializationPolicy::SteadyStateInitial, 0.9),
            1e-9,
            1.0,
            |x| Ok(0.3 - x),
        )
        .unwrap();
        assert!((x - 0.3).abs() < 1e-10);
    }

    #[test]
    fn steady_state_keeps_start_when_already_balanced() {
        let mut calls = 0;
        let x = resolve_extent(
            &init(InitializationPolicy::SteadyStateInitial, 0.42),
            1e-9,
            1.0,
            |_| {
                calls += 1;
                Ok(0.0)
            },
        )
        .unwrap();
        assert_eq!(x, 0.42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn steady_state_fails_without_balance() {
        let err = resolve_extent(
            &init(InitializationPolicy::SteadyStateInitial, 0.5),
            1e-9,
            1.0,
            |_| Ok(1e-3),
        )
        .unwrap_err();
        assert!(matches!(err, VesselError::InitializationFailed { .. }));
    }

    #[test]
    fn steady_state_skips_inadmissible_candidates() {
        // rate undefined above 0.8, balanced at 0.6
        let x = resolve_extent(
            &init(InitializationPolicy::SteadyStateInitial, 0.1),
            1e-9,
            1.0,
            |x| {
                if x > 0.8 {
                    Err(VesselError::NonPhysical { what: "too full" })
                } else {
                    Ok(0.6 - x)
                }
            },
        )
        .unwrap();
        assert!((x - 0.6).abs() < 1e-10);
    }
}
