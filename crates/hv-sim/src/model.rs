//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS computation: x_dot = f(t, x)
/// - State arithmetic for integration: add states, scale by scalar
///
/// Models with discrete modes also expose a switching function. The
/// runner locates its sign changes and calls [`TransientModel::on_event`]
/// at each one so the model can re-select its active equations.
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the state at t=0.
    ///
    /// Takes &mut self so the model can latch its starting mode.
    fn initial_state(&mut self) -> SimResult<Self::State>;

    /// Compute state derivative dxdt = f(t, x) under the latched mode.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Switching function whose sign change marks a mode transition.
    ///
    /// `None` means the model has no discrete modes.
    fn switching_function(&self, _t: f64, _x: &Self::State) -> SimResult<Option<f64>> {
        Ok(None)
    }

    /// Called at a located sign change; re-evaluate the active equations.
    fn on_event(&mut self, _t: f64, _x: &Self::State) -> SimResult<()> {
        Ok(())
    }
}
