//! Transient simulation of hydraulic storage vessels.
//!
//! Provides:
//! - `TransientModel` with an optional switching function for mode changes
//! - Fixed-step RK4 and forward Euler integrators
//! - Bisection of steps that cross a switching event
//! - Port boundary sources (closed, constant, ramp, table, orifice)
//! - `VesselModel`: one vessel driven by its port boundaries

pub mod boundary;
pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod vessel_model;

mod events;

pub use boundary::{
    ClosedPort, FlowRamp, FlowTable, MassFlowSource, OrificeSource, PortBoundary, PortContext,
};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim};
pub use vessel_model::VesselModel;
