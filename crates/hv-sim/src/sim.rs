//! Simulation runner and result recording.

use hv_core::sign_change;

use crate::error::{SimError, SimResult};
use crate::events::locate_crossing;
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;

/// Events packed into less than one time step that mark a mode switch as
/// chattering.
pub const CHATTER_EVENTS: usize = 16;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
    /// Time resolution of located events (seconds)
    pub event_tol: f64,
    /// Bisection limit per located event
    pub max_event_iter: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            t_end: 1.0,
            max_steps: 100_000,
            record_every: 10,
            integrator: IntegratorType::default(),
            event_tol: 1e-9,
            max_event_iter: 100,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        if !self.event_tol.is_finite() || self.event_tol <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "event_tol must be positive",
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
    /// Times of located mode switches (seconds)
    pub events: Vec<f64>,
}

/// One step of the selected integrator.
pub(crate) fn advance<M: TransientModel>(
    model: &mut M,
    integrator: IntegratorType,
    t: f64,
    x: &M::State,
    dt: f64,
) -> SimResult<M::State> {
    match integrator {
        IntegratorType::RK4 => RK4.step(model, t, x, dt),
        IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt),
    }
}

/// Integrate a trial step of `h` and evaluate the switching function at
/// its end.
///
/// A trial that lands in an invalid state is halved as long as the model
/// has a switching function: the failure may lie past a mode switch that
/// the shorter step will expose. Returns the step actually taken.
fn trial_step<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
    t: f64,
    x: &M::State,
    h: f64,
    switched: bool,
) -> SimResult<(f64, M::State, Option<f64>)> {
    let mut h_try = h;
    let mut halvings = 0;
    loop {
        let attempt = advance(model, opts.integrator, t, x, h_try).and_then(|x_new| {
            let z = model.switching_function(t + h_try, &x_new)?;
            Ok((x_new, z))
        });
        match attempt {
            Ok((x_new, z)) => return Ok((h_try, x_new, z)),
            Err(e) => {
                if !switched || halvings >= opts.max_event_iter || 0.5 * h_try < opts.event_tol {
                    return Err(e);
                }
                h_try *= 0.5;
                halvings += 1;
                tracing::debug!(t, h = h_try, error = %e, "trial step failed, halving");
            }
        }
    }
}

/// Run a fixed-step transient simulation.
///
/// A step across a sign change of the model's switching function is cut
/// back to the crossing; the model re-selects its mode there before the run
/// continues with the remaining time. Trial steps that fail are halved
/// first when a switch could lie inside them.
///
/// The run fails when it cannot reach `t_end` within `max_steps` or when
/// the mode switch chatters.
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    opts.validate()?;

    let mut t = 0.0;
    let mut x = model.initial_state()?;

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];
    let mut events = Vec::new();

    tracing::info!(
        t_end = opts.t_end,
        dt = opts.dt,
        integrator = ?opts.integrator,
        "starting transient run"
    );

    let mut step = 0;
    let mut recorded_last = true;
    while step < opts.max_steps {
        let remaining = opts.t_end - t;
        if remaining <= 1e-9 * opts.dt {
            break;
        }
        let h = remaining.min(opts.dt);

        let z0 = model.switching_function(t, &x)?;
        let (h, x_new, z1) = trial_step(model, opts, t, &x, h, z0.is_some())?;

        let mut event = false;
        match (z0, z1) {
            (Some(z0), Some(z1)) if sign_change(z0, z1) => {
                let crossing = locate_crossing(
                    model,
                    opts.integrator,
                    t,
                    &x,
                    h,
                    x_new,
                    z0,
                    opts.event_tol,
                    opts.max_event_iter,
                )?;
                t += crossing.h;
                x = crossing.x;
                model.on_event(t, &x)?;
                events.push(t);
                event = true;
                tracing::info!(t, "mode switch");

                if events.len() >= CHATTER_EVENTS
                    && t - events[events.len() - CHATTER_EVENTS] < opts.dt
                {
                    tracing::warn!(t, events = events.len(), "mode switch chattering");
                    return Err(SimError::EventChatter {
                        t,
                        events: CHATTER_EVENTS,
                    });
                }
            }
            _ => {
                t += h;
                x = x_new;
            }
        }
        step += 1;

        recorded_last = event || step % opts.record_every == 0;
        if recorded_last {
            t_record.push(t);
            x_record.push(x.clone());
        }
    }

    if opts.t_end - t > 1e-9 * opts.dt {
        tracing::warn!(t, t_end = opts.t_end, "step limit reached before t_end");
        return Err(SimError::StepLimit {
            t,
            t_end: opts.t_end,
            max_steps: opts.max_steps,
        });
    }

    // Always record final state
    if !recorded_last {
        t_record.push(t);
        x_record.push(x);
    }

    tracing::info!(steps = step, events = events.len(), t, "transient run finished");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        events,
    })
}
